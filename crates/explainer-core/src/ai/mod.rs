//! Remote model integration
//!
//! This module provides the remote half of the analysis pipeline:
//! - Abstract remote analyzer interface
//! - OpenAI-compatible chat-completion provider
//! - Prompt construction and reply parsing

pub mod parse;
pub mod prompt;
pub mod providers;

// Re-export main types
pub use parse::parse_reply;
pub use prompt::{SYSTEM_INSTRUCTION, build_messages};
pub use providers::OpenAIProvider;

use crate::credential::Credential;
use async_trait::async_trait;
use explainer_shared::{AnalysisRequest, AnalysisResult, RemoteError};
use serde::{Deserialize, Serialize};

/// Abstract trait for remote analysis backends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteAnalyzer: Send + Sync {
    /// Run one analysis against the remote model.
    ///
    /// Implementations make a single attempt; the caller owns the fallback.
    async fn analyze_remote(
        &self,
        request: &AnalysisRequest,
        credential: &Credential,
    ) -> Result<AnalysisResult, RemoteError>;
}

/// Chat message in a completion request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Role of a message
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}
