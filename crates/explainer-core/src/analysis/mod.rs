//! Snippet and project analysis
//!
//! This module provides the deterministic half of the pipeline:
//! - Project language summary
//! - Snippet classification
//! - Canned responses per category
//! - Import context for the remote prompt

pub mod classifier;
pub mod context;
pub mod project;
pub mod synthesizer;

// Re-export main types
pub use classifier::{CLASSIFICATION_RULES, ClassificationRule, classify};
pub use context::{surrounding_context, surrounding_context_from_file};
pub use project::{NO_FILES_SUMMARY, ProjectSummarizer};
pub use synthesizer::synthesize;

use explainer_shared::AnalysisResult;

/// Classify `code` and return the canned analysis for its category
pub fn fallback_analysis(code: &str, file_type: &str) -> AnalysisResult {
    synthesize(classify(code, file_type))
}
