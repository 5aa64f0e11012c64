//! Configuration loading and management for suma.
//!
//! Loads settings from `suma.toml` with an environment variable override for the
//! API key. Resolution happens once at startup; the resulting `Config` is passed
//! by reference to everything that makes outbound calls.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing OpenAI API key (set OPENAI_API_KEY or api.openai_key in suma.toml)")]
    MissingApiKey,
}

/// LLM settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the chat-completion API
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// API key configuration (file value, overridden by the environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Load configuration from the default locations, falling back to built-in
    /// defaults when no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };

        // The environment always wins for the key
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.api.openai_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("suma.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("suma").join("suma.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Get the API key, if one was resolved
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .openai_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let config = Config::default();
        assert_eq!(config.agent.model, "gpt-4.1-mini");
        assert_eq!(config.agent.api_base, "https://api.openai.com/v1");
        assert!(config.api.openai_key.is_none());
    }

    #[test]
    fn missing_key_is_an_error() {
        let config = Config::default();
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[agent]\nmodel = \"gpt-4.1\"\n\n[api]\nopenai_key = \"sk-test\"\n"
        )
        .unwrap();

        let config = Config::load_from(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.agent.model, "gpt-4.1");
        assert_eq!(config.api_key().unwrap(), "sk-test");
        // unset sections keep their defaults
        assert_eq!(config.agent.api_base, "https://api.openai.com/v1");
    }
}
