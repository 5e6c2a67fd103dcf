//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every section falls
//! back to its defaults when missing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_APP_NAME: &str = "FireflyChat";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MAX_TOKENS: u32 = 1200;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub openai: OpenAiConfig,
    pub storage: StorageConfig,
    pub sessions: SessionPolicyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            openai: OpenAiConfig::default(),
            storage: StorageConfig::default(),
            sessions: SessionPolicyConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; usually supplied through `OPENAI_API_KEY` instead of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpenAiConfig {
    /// Returns the API key if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the location of the chat archive (`chats.toml`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chats_file: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionPolicyConfig {
    /// Refresh the session list automatically after a successful rename.
    pub refresh_after_rename: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.max_tokens, 1200);
        assert!(!config.sessions.refresh_after_rename);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[openai]
model = "gpt-4o-mini"

[sessions]
refresh_after_rename = true
"#,
        )
        .unwrap();
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.temperature, DEFAULT_TEMPERATURE);
        assert!(config.sessions.refresh_after_rename);
        assert_eq!(config.app_name, "FireflyChat");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let openai = OpenAiConfig {
            api_key: Some("   ".to_string()),
            ..OpenAiConfig::default()
        };
        assert_eq!(openai.api_key(), None);
    }
}
