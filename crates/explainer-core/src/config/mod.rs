//! Configuration Management
//!
//! This module handles the settings side of Context Explainer:
//! - Loading and saving the TOML settings file
//! - Environment variable overrides
//! - API key storage and per-request credential resolution
//! - Dotted-path reads and writes for the CLI

use crate::credential::{self, CredentialSources, ResolvedCredential};
use explainer_shared::{ConfigError, ExplainerConfig, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Settings file name used by discovery
pub const CONFIG_FILE_NAME: &str = "explainer.toml";

const CONFIG_DIR_NAME: &str = "context-explainer";
const HOME_CONFIG_FILE_NAME: &str = ".context-explainer.toml";

/// Keys accepted by `get_value` and `set_value`
pub const CONFIG_KEYS: &[&str] = &[
    "remote.endpoint",
    "remote.model",
    "remote.temperature",
    "remote.max_tokens",
    "remote.connect_timeout_secs",
    "remote.read_timeout_secs",
    "summary.max_depth",
    "summary.top_languages",
    "credential.env_var",
    "logging.level",
    "logging.json",
];

/// Configuration manager for Context Explainer
pub struct ConfigManager {
    /// Current configuration
    config: Arc<RwLock<ExplainerConfig>>,

    /// Settings file written on updates
    config_path: Option<PathBuf>,

    /// In-process key that outranks every other source
    credential_override: RwLock<Option<String>>,
}

impl ConfigManager {
    /// Create an in-memory configuration manager
    pub fn new(config: ExplainerConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path: None,
            credential_override: RwLock::new(None),
        }
    }

    /// Create configuration manager from file
    #[instrument]
    pub async fn from_file<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let config = if path.exists() {
            ExplainerConfig::load_from_file(path)?
        } else {
            warn!("Configuration file not found, using defaults");
            ExplainerConfig::load_with_env()?
        };

        Ok(Self {
            config_path: Some(path.to_path_buf()),
            ..Self::new(config)
        })
    }

    /// Create with automatic configuration discovery.
    ///
    /// Without a settings file the defaults are used and the first writable
    /// location becomes the target for later saves.
    #[instrument]
    pub async fn auto_discover() -> Result<Self> {
        debug!("Auto-discovering configuration");

        for path in Self::config_search_paths() {
            if path.exists() {
                debug!("Found configuration at: {}", path.display());
                return Self::from_file(path).await;
            }
        }

        debug!("No configuration file found, using defaults");
        let config = ExplainerConfig::load_with_env()?;

        Ok(Self {
            config_path: Self::default_config_path(),
            ..Self::new(config)
        })
    }

    /// Get current configuration (read-only)
    pub async fn get_config(&self) -> ExplainerConfig {
        self.config.read().await.clone()
    }

    /// Settings file backing this manager, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Replace the configuration; saved when file-backed
    #[instrument(skip(self, new_config))]
    pub async fn update_config(&self, new_config: ExplainerConfig) -> Result<()> {
        new_config.validate()?;

        let mut config = self.config.write().await;
        *config = new_config;
        self.persist(&config).await?;

        info!("Configuration updated");
        Ok(())
    }

    /// Save current configuration to file
    #[instrument(skip(self))]
    pub async fn save_to_file<P: AsRef<Path> + std::fmt::Debug>(&self, path: P) -> Result<()> {
        let config = self.config.read().await;
        Self::write_file(&config, path.as_ref()).await
    }

    /// Get configuration value by key path
    pub async fn get_value(&self, key_path: &str) -> Option<ConfigValue> {
        let config = self.config.read().await;
        Self::extract_value_by_path(&config, key_path)
    }

    /// Set configuration value by key path.
    ///
    /// The whole configuration is revalidated before the change is kept.
    #[instrument(skip(self, value))]
    pub async fn set_value(&self, key_path: &str, value: ConfigValue) -> Result<()> {
        debug!("Setting config value: {} = {}", key_path, value);

        let mut config = self.config.write().await;
        let mut updated = config.clone();
        Self::set_value_by_path(&mut updated, key_path, value)?;
        updated.validate()?;

        *config = updated;
        self.persist(&config).await
    }

    /// Set or clear the in-process key override
    pub async fn set_credential_override(&self, key: Option<String>) {
        *self.credential_override.write().await = key;
    }

    /// Persist an API key from settings.
    ///
    /// An empty value clears the stored key.
    #[instrument(skip_all)]
    pub async fn store_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        let mut config = self.config.write().await;

        if key.is_empty() {
            config.credential.api_key = None;
            info!("Stored API key cleared");
        } else {
            credential::validate_for_storage(key)?;
            config.credential.api_key = Some(key.to_string());
            info!("API key stored");
        }

        self.persist(&config).await
    }

    /// Resolve the credential for one request from override, environment and settings
    pub async fn resolve_credential(&self) -> ResolvedCredential {
        let override_key = self.credential_override.read().await.clone();
        let config = self.config.read().await;
        let env_key = std::env::var(&config.credential.env_var).ok();

        credential::resolve_credential(CredentialSources {
            override_key: override_key.as_deref(),
            env_key: env_key.as_deref(),
            persisted_key: config.credential.api_key.as_deref(),
        })
    }

    async fn persist(&self, config: &ExplainerConfig) -> Result<()> {
        match self.config_path {
            Some(ref path) => Self::write_file(config, path).await,
            None => Ok(()),
        }
    }

    async fn write_file(config: &ExplainerConfig, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        config.save_to_file(path)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Get configuration search paths
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(HOME_CONFIG_FILE_NAME));
        }

        paths
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .or_else(|| dirs::home_dir().map(|dir| dir.join(HOME_CONFIG_FILE_NAME)))
    }

    /// Extract configuration value by dot-separated path
    fn extract_value_by_path(config: &ExplainerConfig, key_path: &str) -> Option<ConfigValue> {
        let parts: Vec<&str> = key_path.split('.').collect();

        let value = match parts.as_slice() {
            ["remote", "endpoint"] => ConfigValue::String(config.remote.endpoint.clone()),
            ["remote", "model"] => ConfigValue::String(config.remote.model.clone()),
            ["remote", "temperature"] => ConfigValue::Number(f64::from(config.remote.temperature)),
            ["remote", "max_tokens"] => ConfigValue::Number(f64::from(config.remote.max_tokens)),
            ["remote", "connect_timeout_secs"] => {
                ConfigValue::Number(config.remote.connect_timeout_secs as f64)
            }
            ["remote", "read_timeout_secs"] => {
                ConfigValue::Number(config.remote.read_timeout_secs as f64)
            }
            ["summary", "max_depth"] => ConfigValue::Number(config.summary.max_depth as f64),
            ["summary", "top_languages"] => {
                ConfigValue::Number(config.summary.top_languages as f64)
            }
            ["credential", "env_var"] => ConfigValue::String(config.credential.env_var.clone()),
            ["logging", "level"] => ConfigValue::String(config.logging.level.clone()),
            ["logging", "json"] => ConfigValue::Bool(config.logging.json),
            _ => return None,
        };

        Some(value)
    }

    /// Set configuration value by dot-separated path
    fn set_value_by_path(
        config: &mut ExplainerConfig,
        key_path: &str,
        value: ConfigValue,
    ) -> Result<()> {
        let parts: Vec<&str> = key_path.split('.').collect();

        match parts.as_slice() {
            ["remote", "endpoint"] => config.remote.endpoint = value.to_string(),
            ["remote", "model"] => config.remote.model = value.to_string(),
            ["remote", "temperature"] => {
                config.remote.temperature = value.as_number(key_path)? as f32;
            }
            ["remote", "max_tokens"] => {
                config.remote.max_tokens = value.as_count(key_path)?.try_into().map_err(|_| {
                    ConfigError::InvalidValue {
                        key: key_path.to_string(),
                        value: value.to_string(),
                    }
                })?;
            }
            ["remote", "connect_timeout_secs"] => {
                config.remote.connect_timeout_secs = value.as_count(key_path)?;
            }
            ["remote", "read_timeout_secs"] => {
                config.remote.read_timeout_secs = value.as_count(key_path)?;
            }
            ["summary", "max_depth"] => {
                config.summary.max_depth = value.as_count(key_path)? as usize;
            }
            ["summary", "top_languages"] => {
                config.summary.top_languages = value.as_count(key_path)? as usize;
            }
            ["credential", "env_var"] => config.credential.env_var = value.to_string(),
            ["logging", "level"] => config.logging.level = value.to_string(),
            ["logging", "json"] => config.logging.json = value.as_bool(key_path)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key_path.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Configuration value types
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Bool(bool),
    Number(f64),
}

impl ConfigValue {
    /// Interpret a command-line value: booleans, then numbers, else text
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => raw
                .parse::<f64>()
                .map(ConfigValue::Number)
                .unwrap_or_else(|_| ConfigValue::String(raw.to_string())),
        }
    }

    fn as_number(&self, key: &str) -> Result<f64> {
        match self {
            ConfigValue::Number(n) => Ok(*n),
            other => Err(other.invalid_for(key)),
        }
    }

    fn as_count(&self, key: &str) -> Result<u64> {
        match self {
            ConfigValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Ok(*n as u64),
            other => Err(other.invalid_for(key)),
        }
    }

    fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            ConfigValue::Bool(b) => Ok(*b),
            other => Err(other.invalid_for(key)),
        }
    }

    fn invalid_for(&self, key: &str) -> explainer_shared::ExplainerError {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: self.to_string(),
        }
        .into()
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialSource;
    use explainer_shared::{CredentialError, ExplainerError};
    use tempfile::TempDir;

    const UNSET_ENV_VAR: &str = "EXPLAINER_TEST_KEY_THAT_IS_NEVER_SET";

    fn isolated_config() -> ExplainerConfig {
        let mut config = ExplainerConfig::default();
        config.credential.env_var = UNSET_ENV_VAR.to_string();
        config
    }

    #[tokio::test]
    async fn test_config_manager_creation() {
        let manager = ConfigManager::new(ExplainerConfig::default());

        let current_config = manager.get_config().await;
        assert_eq!(current_config, ExplainerConfig::default());
        assert!(manager.config_path().is_none());
    }

    #[tokio::test]
    async fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("explainer.toml");

        let mut config = ExplainerConfig::default();
        config.remote.model = "gpt-4o-mini".to_string();
        let manager = ConfigManager::new(config);

        manager.save_to_file(&config_path).await.unwrap();
        assert!(config_path.exists());

        let loaded_manager = ConfigManager::from_file(&config_path).await.unwrap();
        let loaded_config = loaded_manager.get_config().await;

        assert_eq!(loaded_config.remote.model, "gpt-4o-mini");
        assert_eq!(loaded_manager.config_path(), Some(config_path.as_path()));
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.toml");

        let manager = ConfigManager::from_file(&config_path).await.unwrap();
        assert_eq!(manager.get_config().await.summary.max_depth, 3);
        assert!(!config_path.exists());
    }

    #[tokio::test]
    async fn test_config_value_operations() {
        let manager = ConfigManager::new(ExplainerConfig::default());

        assert_eq!(
            manager.get_value("logging.level").await,
            Some(ConfigValue::String("info".to_string()))
        );
        assert_eq!(
            manager.get_value("remote.max_tokens").await,
            Some(ConfigValue::Number(1500.0))
        );
        assert!(manager.get_value("remote.unknown").await.is_none());

        manager
            .set_value("logging.level", ConfigValue::String("debug".to_string()))
            .await
            .unwrap();
        manager
            .set_value("summary.max_depth", ConfigValue::parse("5"))
            .await
            .unwrap();
        manager.set_value("logging.json", ConfigValue::parse("true")).await.unwrap();

        let updated_config = manager.get_config().await;
        assert_eq!(updated_config.logging.level, "debug");
        assert_eq!(updated_config.summary.max_depth, 5);
        assert!(updated_config.logging.json);
    }

    #[tokio::test]
    async fn test_every_listed_key_is_readable() {
        let manager = ConfigManager::new(ExplainerConfig::default());
        for key in CONFIG_KEYS {
            assert!(manager.get_value(key).await.is_some(), "{} not readable", key);
        }
    }

    #[tokio::test]
    async fn test_rejected_values_leave_config_unchanged() {
        let manager = ConfigManager::new(ExplainerConfig::default());

        let unknown = manager.set_value("remote.retries", ConfigValue::parse("3")).await;
        assert!(matches!(unknown, Err(ExplainerError::Config { .. })));

        let wrong_type = manager.set_value("remote.max_tokens", ConfigValue::parse("many")).await;
        assert!(wrong_type.is_err());

        let out_of_range = manager.set_value("remote.temperature", ConfigValue::parse("7.5")).await;
        assert!(out_of_range.is_err());

        let zero_depth = manager.set_value("summary.max_depth", ConfigValue::parse("0")).await;
        assert!(zero_depth.is_err());

        assert_eq!(manager.get_config().await, ExplainerConfig::default());
    }

    #[tokio::test]
    async fn test_set_value_persists_when_file_backed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("explainer.toml");

        let manager = ConfigManager::from_file(&config_path).await.unwrap();
        manager
            .set_value("remote.model", ConfigValue::parse("gpt-4"))
            .await
            .unwrap();

        let reloaded = ExplainerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(reloaded.remote.model, "gpt-4");
    }

    #[tokio::test]
    async fn test_store_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("explainer.toml");
        let manager = ConfigManager::from_file(&config_path).await.unwrap();

        let short = manager.store_api_key("sk-short").await;
        assert!(matches!(
            short,
            Err(ExplainerError::Credential(CredentialError::TooShort { .. }))
        ));

        let no_prefix = manager.store_api_key("pk-0123456789abcdefghij").await;
        assert!(matches!(
            no_prefix,
            Err(ExplainerError::Credential(CredentialError::MissingPrefix))
        ));

        manager.store_api_key("sk-0123456789abcdefghij").await.unwrap();
        let reloaded = ExplainerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(reloaded.credential.api_key.as_deref(), Some("sk-0123456789abcdefghij"));

        manager.store_api_key("   ").await.unwrap();
        assert!(manager.get_config().await.credential.api_key.is_none());
    }

    #[tokio::test]
    async fn test_resolve_credential_precedence() {
        let mut config = isolated_config();
        config.credential.api_key = Some("sk-persisted-0123456789".to_string());
        let manager = ConfigManager::new(config);

        let resolved = manager.resolve_credential().await;
        assert_eq!(resolved.source, CredentialSource::Settings);
        assert!(resolved.credential.is_some());

        manager
            .set_credential_override(Some("sk-override-0123456789".to_string()))
            .await;
        let resolved = manager.resolve_credential().await;
        assert_eq!(resolved.source, CredentialSource::Override);
        assert_eq!(
            resolved.credential.map(|c| c.expose().to_string()),
            Some("sk-override-0123456789".to_string())
        );

        manager.set_credential_override(None).await;
        assert_eq!(manager.resolve_credential().await.source, CredentialSource::Settings);
    }

    #[tokio::test]
    async fn test_invalid_environment_key_does_not_fall_through() {
        // PATH is always set and never looks like an API key
        let mut config = ExplainerConfig::default();
        config.credential.env_var = "PATH".to_string();
        config.credential.api_key = Some("sk-persisted-0123456789".to_string());
        let manager = ConfigManager::new(config);

        let resolved = manager.resolve_credential().await;
        assert_eq!(resolved.source, CredentialSource::Environment);
        assert!(resolved.credential.is_none());
        assert_eq!(resolved.rejected, Some(CredentialError::MissingPrefix));
    }

    #[tokio::test]
    async fn test_no_sources_is_demo_mode() {
        let manager = ConfigManager::new(isolated_config());
        let resolved = manager.resolve_credential().await;

        assert_eq!(resolved.source, CredentialSource::DemoMode);
        assert!(resolved.credential.is_none());
        assert!(resolved.rejected.is_none());
    }

    #[test]
    fn test_config_value_parse_and_display() {
        assert_eq!(ConfigValue::parse("true"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::parse("0.5"), ConfigValue::Number(0.5));
        assert_eq!(
            ConfigValue::parse("gpt-4"),
            ConfigValue::String("gpt-4".to_string())
        );

        assert_eq!(ConfigValue::Number(1500.0).to_string(), "1500");
        assert_eq!(ConfigValue::Bool(false).to_string(), "false");
    }
}
