//! Configuration management for Context Explainer

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `EXPLAINER__REMOTE__MODEL`
pub const ENV_PREFIX: &str = "EXPLAINER";

/// Main configuration structure for Context Explainer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Remote chat-completion settings
    pub remote: RemoteConfig,

    /// Project summarization settings
    pub summary: SummaryConfig,

    /// Credential sources
    pub credential: CredentialConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for the remote model provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Chat-completion endpoint
    pub endpoint: String,

    /// Model to request
    pub model: String,

    /// Temperature settings (0.0 - 2.0)
    pub temperature: f32,

    /// Maximum tokens for the reply
    pub max_tokens: u32,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    pub read_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_tokens: 1500,
            connect_timeout_secs: 30,
            read_timeout_secs: 60,
        }
    }
}

/// Project summarizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Directory traversal depth (root is depth 0)
    pub max_depth: usize,

    /// Number of languages listed in the summary
    pub top_languages: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            top_languages: 5,
        }
    }
}

/// Where the API key may come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable holding the API key
    pub env_var: String,

    /// Persisted API key, written by `ConfigManager::store_api_key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            env_var: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExplainerConfig {
    /// Load configuration from a TOML file, overlaid with environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(Self::env_source())
            .build()
            .map_err(|e| ConfigError::InvalidFormat {
                message: e.to_string(),
            })?;

        let loaded: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::InvalidFormat {
                message: e.to_string(),
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Defaults overlaid with environment overrides only
    pub fn load_with_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::env_source())
            .build()
            .map_err(|e| ConfigError::InvalidFormat {
                message: e.to_string(),
            })?;

        let loaded: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::InvalidFormat {
                message: e.to_string(),
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Save configuration as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat {
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.remote.endpoint.trim().is_empty() {
            return Err(invalid("remote.endpoint", &self.remote.endpoint));
        }
        if self.remote.model.trim().is_empty() {
            return Err(invalid("remote.model", &self.remote.model));
        }
        if !(0.0..=2.0).contains(&self.remote.temperature) {
            return Err(invalid(
                "remote.temperature",
                &self.remote.temperature.to_string(),
            ));
        }
        if self.remote.max_tokens == 0 {
            return Err(invalid("remote.max_tokens", "0"));
        }
        if self.remote.connect_timeout_secs == 0 {
            return Err(invalid("remote.connect_timeout_secs", "0"));
        }
        if self.remote.read_timeout_secs == 0 {
            return Err(invalid("remote.read_timeout_secs", "0"));
        }
        if self.summary.max_depth == 0 {
            return Err(invalid("summary.max_depth", "0"));
        }
        if self.summary.top_languages == 0 {
            return Err(invalid("summary.top_languages", "0"));
        }
        if self.credential.env_var.trim().is_empty() {
            return Err(invalid("credential.env_var", &self.credential.env_var));
        }

        Ok(())
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}

fn invalid(key: &str, value: &str) -> crate::error::ExplainerError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExplainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.remote.model, "gpt-3.5-turbo");
        assert_eq!(config.remote.connect_timeout_secs, 30);
        assert_eq!(config.remote.read_timeout_secs, 60);
        assert_eq!(config.summary.max_depth, 3);
        assert_eq!(config.credential.env_var, "OPENAI_API_KEY");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("explainer.toml");
        std::fs::write(&path, "[remote]\nmodel = \"gpt-4o-mini\"\n\n[summary]\ntop_languages = 3\n")
            .unwrap();

        let config = ExplainerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.remote.model, "gpt-4o-mini");
        assert_eq!(config.remote.max_tokens, 1500);
        assert_eq!(config.summary.top_languages, 3);
        assert_eq!(config.summary.max_depth, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("explainer.toml");

        let mut config = ExplainerConfig::default();
        config.credential.api_key = Some("sk-persisted-0123456789".to_string());
        config.logging.level = "debug".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = ExplainerConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.credential.api_key.as_deref(), Some("sk-persisted-0123456789"));
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.remote.endpoint, config.remote.endpoint);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = ExplainerConfig::load_from_file(Path::new("/nonexistent/explainer.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = ExplainerConfig::default();
        config.remote.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_summary_limits_rejected() {
        let mut config = ExplainerConfig::default();
        config.summary.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = ExplainerConfig::default();
        config.summary.top_languages = 0;
        assert!(config.validate().is_err());
    }
}
