//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml` in the config
//! directory and layers environment overrides on top.

use crate::paths::FireflyPaths;
use crate::storage::AtomicTomlFile;
use firefly_core::config::AppConfig;
use firefly_core::error::Result;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Environment variable holding the OpenAI API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the completion model.
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";

/// Loads and caches the application configuration.
///
/// A missing config file is created with the defaults on first load; an empty
/// one yields the defaults without being rewritten.
pub struct ConfigService {
    file: AtomicTomlFile<AppConfig>,
    cached: RwLock<Option<AppConfig>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            cached: RwLock::new(None),
        }
    }

    pub fn from_paths(paths: &FireflyPaths) -> Self {
        Self::new(paths.config_file())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration, reading the file on first access.
    ///
    /// Environment overrides from the process environment are applied.
    pub fn get_config(&self) -> Result<AppConfig> {
        self.get_config_with(|key| std::env::var(key).ok())
    }

    /// Like [`get_config`](Self::get_config) with a custom environment lookup.
    pub fn get_config_with<F>(&self, lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cached) = self
            .cached
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, lookup);

        *self.cached.write().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.cached.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn load_file(&self) -> Result<AppConfig> {
        if let Some(config) = self.file.load()? {
            tracing::debug!("[ConfigService] Loaded {}", self.path().display());
            return Ok(config);
        }

        let config = AppConfig::default();
        if !self.path().exists() {
            self.file.save(&config)?;
            tracing::info!(
                "[ConfigService] Wrote default config to {}",
                self.path().display()
            );
        }
        Ok(config)
    }
}

/// Applies `OPENAI_API_KEY` and `OPENAI_MODEL` on top of the file values.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = non_blank(ENV_OPENAI_API_KEY) {
        config.openai.api_key = Some(api_key);
    }
    if let Some(model) = non_blank(ENV_OPENAI_MODEL) {
        tracing::debug!("[ConfigService] Model overridden by environment: {}", model);
        config.openai.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults_and_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let config = service.get_config_with(no_env).unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(service.path().exists());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = ConfigService::new(&path).get_config_with(no_env).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_file_values_are_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[openai]\nmodel = \"gpt-4o-mini\"\nmax_tokens = 500\n\n[sessions]\nrefresh_after_rename = true\n",
        )
        .unwrap();

        let config = ConfigService::new(&path).get_config_with(no_env).unwrap();

        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 500);
        assert!(config.sessions.refresh_after_rename);
    }

    #[test]
    fn test_environment_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[openai]\nmodel = \"gpt-4o-mini\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_OPENAI_API_KEY, "sk-test"),
            (ENV_OPENAI_MODEL, "gpt-4.1"),
        ]
        .into_iter()
        .collect();

        let config = ConfigService::new(&path)
            .get_config_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.openai.api_key(), Some("sk-test"));
        assert_eq!(config.openai.model, "gpt-4.1");
    }

    #[test]
    fn test_blank_environment_values_are_ignored() {
        let mut config = AppConfig::default();

        apply_env_overrides(&mut config, |_| Some("  ".to_string()));

        assert_eq!(config.openai.api_key, None);
        assert_eq!(config.openai.model, "gpt-4o");
    }

    #[test]
    fn test_cache_and_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(&path);
        service.get_config_with(no_env).unwrap();

        fs::write(&path, "app_name = \"Changed\"\n").unwrap();
        assert_eq!(service.get_config_with(no_env).unwrap().app_name, "FireflyChat");

        service.invalidate_cache();
        assert_eq!(service.get_config_with(no_env).unwrap().app_name, "Changed");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[openai\n").unwrap();

        assert!(ConfigService::new(&path).get_config_with(no_env).is_err());
    }
}
