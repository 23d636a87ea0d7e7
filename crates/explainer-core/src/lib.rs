//! # Explainer Core
//!
//! Core engine for Context Explainer - context-aware code snippet analysis
//!
//! This crate provides the analysis pipeline behind the editor command and CLI:
//! - Project language summary and snippet classification
//! - Remote model client with a synthesized fallback
//! - API key resolution
//! - Configuration and settings management

pub mod ai;
pub mod analysis;
pub mod config;
pub mod credential;
pub mod engine;

// Re-export commonly used types
pub use explainer_shared::*;

pub use ai::{OpenAIProvider, RemoteAnalyzer};
pub use analysis::{ProjectSummarizer, classify, fallback_analysis, synthesize};
pub use config::{ConfigManager, ConfigValue};
pub use credential::{Credential, CredentialSource, ResolvedCredential};
pub use engine::ExplainerEngine;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main facade for Context Explainer
///
/// Builds the engine from discovered or explicit configuration.
pub struct ContextExplainer {
    engine: ExplainerEngine,
}

impl ContextExplainer {
    /// Create an instance from the discovered settings file
    pub async fn new() -> Result<Self> {
        let config_manager = ConfigManager::auto_discover().await?;
        Self::with_manager(config_manager).await
    }

    /// Create an instance from an in-memory configuration
    pub async fn with_config(config: ExplainerConfig) -> Result<Self> {
        config.validate()?;
        Self::with_manager(ConfigManager::new(config)).await
    }

    /// Create an instance around an existing configuration manager
    pub async fn with_manager(config_manager: ConfigManager) -> Result<Self> {
        let engine = ExplainerEngine::new(std::sync::Arc::new(config_manager)).await?;
        Ok(Self { engine })
    }

    /// Get the underlying engine
    pub fn engine(&self) -> &ExplainerEngine {
        &self.engine
    }

    /// Get the configuration manager
    pub fn config_manager(&self) -> &ConfigManager {
        self.engine.config_manager()
    }

    /// Explain a snippet within the project at `project_root`
    pub async fn analyze(
        &self,
        code: &str,
        file_type: &str,
        project_root: &std::path::Path,
    ) -> AnalysisResult {
        self.engine.analyze(code, file_type, project_root).await
    }

    /// Explain a snippet taken from `source_file`
    pub async fn analyze_in_file(
        &self,
        code: &str,
        file_type: &str,
        project_root: &std::path::Path,
        source_file: &std::path::Path,
    ) -> AnalysisResult {
        self.engine
            .analyze_in_file(code, file_type, project_root, source_file)
            .await
    }

    /// Get current configuration
    pub async fn config(&self) -> ExplainerConfig {
        self.config_manager().get_config().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_context_explainer_creation() {
        let explainer = ContextExplainer::with_config(ExplainerConfig::default()).await;
        assert!(explainer.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = ExplainerConfig::default();
        config.remote.max_tokens = 0;

        assert!(ContextExplainer::with_config(config).await.is_err());
    }

    #[tokio::test]
    async fn test_demo_mode_analysis() {
        let mut config = ExplainerConfig::default();
        config.credential.env_var = "EXPLAINER_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        config.credential.api_key = Some(credential::DEMO_MODE.to_string());

        let explainer = ContextExplainer::with_config(config).await.unwrap();
        let temp_dir = TempDir::new().unwrap();
        let result = explainer
            .analyze("@app.route('/')\ndef index(): ...", "Python", temp_dir.path())
            .await;

        assert_eq!(result, synthesize(Category::WebRoute));
    }
}
