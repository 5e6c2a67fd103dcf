//! Unified path management for FireflyChat files.
//!
//! Resolves the platform config and data directories through `dirs`, so the
//! layout is consistent on Linux, macOS and Windows.

use firefly_core::error::{FireflyError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "fireflychat";

/// Unified path management for FireflyChat.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/fireflychat/         # Config directory
/// └── config.toml                # Application configuration
///
/// ~/.local/share/fireflychat/    # Data directory
/// ├── chats.toml                 # Session archive
/// └── logs/                      # Application logs
///     └── firefly.log.YYYY-MM-DD
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireflyPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl FireflyPaths {
    /// Resolves the platform directories for the current user.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform directories cannot be determined.
    pub fn resolve() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FireflyError::config("Cannot find config directory"))?;
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FireflyError::config("Cannot find data directory"))?;

        Ok(Self {
            config_dir: config_dir.join(APP_DIR_NAME),
            data_dir: data_dir.join(APP_DIR_NAME),
        })
    }

    /// Places every file below a single root directory.
    ///
    /// Used by tests and by the `FIREFLY_HOME` override.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Returns the default location of the session archive.
    pub fn chats_file(&self) -> PathBuf {
        self.data_dir.join("chats.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Creates the config, data and logs directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
