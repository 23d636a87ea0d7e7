//! Core engine that runs one analysis end to end

use crate::ai::{OpenAIProvider, RemoteAnalyzer};
use crate::analysis::{
    NO_FILES_SUMMARY, ProjectSummarizer, fallback_analysis, surrounding_context_from_file,
};
use crate::config::ConfigManager;
use crate::credential::Credential;
use explainer_shared::{AnalysisRequest, AnalysisResult, CredentialError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Main engine that coordinates credential resolution, the remote model
/// and the synthesized fallback.
///
/// Analysis never fails: every problem on the remote path degrades to the
/// synthesized result for the snippet's category.
pub struct ExplainerEngine {
    /// Configuration manager
    config_manager: Arc<ConfigManager>,

    /// Remote analysis backend
    remote: Arc<dyn RemoteAnalyzer>,
}

impl ExplainerEngine {
    /// Create an engine backed by the OpenAI-compatible provider
    #[instrument(skip_all)]
    pub async fn new(config_manager: Arc<ConfigManager>) -> Result<Self> {
        let config = config_manager.get_config().await;
        let remote = Arc::new(OpenAIProvider::new(&config.remote)?);

        debug!(model = %config.remote.model, "Explainer engine initialized");
        Ok(Self::with_remote(config_manager, remote))
    }

    /// Create an engine with a custom remote backend
    pub fn with_remote(config_manager: Arc<ConfigManager>, remote: Arc<dyn RemoteAnalyzer>) -> Self {
        Self {
            config_manager,
            remote,
        }
    }

    /// Get the configuration manager
    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Explain `code` in the context of the project at `project_root`
    #[instrument(skip_all, fields(file_type = %file_type, root = %project_root.display()))]
    pub async fn analyze(&self, code: &str, file_type: &str, project_root: &Path) -> AnalysisResult {
        self.run(code, file_type, project_root, None).await
    }

    /// Like `analyze`, adding the imports of `source_file` as context
    #[instrument(
        skip_all,
        fields(file_type = %file_type, root = %project_root.display(), source = %source_file.display())
    )]
    pub async fn analyze_in_file(
        &self,
        code: &str,
        file_type: &str,
        project_root: &Path,
        source_file: &Path,
    ) -> AnalysisResult {
        self.run(code, file_type, project_root, Some(source_file)).await
    }

    async fn run(
        &self,
        code: &str,
        file_type: &str,
        project_root: &Path,
        source_file: Option<&Path>,
    ) -> AnalysisResult {
        let Some(credential) = self.credential().await else {
            return fallback_analysis(code, file_type);
        };

        let project_summary = self.project_summary(project_root).await;
        let surrounding_context = match source_file {
            Some(path) => surrounding_context_from_file(path).await,
            None => String::new(),
        };

        let request = AnalysisRequest::new(code, file_type, project_summary, surrounding_context);

        match self.remote.analyze_remote(&request, &credential).await {
            Ok(result) => {
                info!("Remote analysis complete");
                result
            }
            Err(e) => {
                warn!("Remote analysis failed, using synthesized analysis: {}", e);
                fallback_analysis(code, file_type)
            }
        }
    }

    /// Resolve the key for this request; `None` selects the synthesized path
    async fn credential(&self) -> Option<Credential> {
        let resolved = self.config_manager.resolve_credential().await;

        match (resolved.credential, resolved.rejected) {
            (Some(credential), _) => {
                debug!(source = %resolved.source, "Using API key");
                Some(credential)
            }
            (None, Some(CredentialError::DemoMode)) => {
                info!("Demo mode, using synthesized analysis");
                None
            }
            (None, Some(e)) => {
                warn!(source = %resolved.source, "Ignoring API key: {}", e);
                None
            }
            (None, None) => {
                debug!("No API key configured, using synthesized analysis");
                None
            }
        }
    }

    async fn project_summary(&self, project_root: &Path) -> String {
        let config = self.config_manager.get_config().await;
        let summarizer = ProjectSummarizer::new(&config.summary);
        let root = project_root.to_path_buf();

        tokio::task::spawn_blocking(move || summarizer.summarize(&root))
            .await
            .unwrap_or_else(|e| {
                warn!("Project summary task failed: {}", e);
                NO_FILES_SUMMARY.to_string()
            })
    }
}
