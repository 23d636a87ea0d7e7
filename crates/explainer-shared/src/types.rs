//! Core types used throughout Context Explainer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of snippet categories assigned by the pattern classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    RestController,
    WebRoute,
    ReactiveUi,
    SqlQuery,
    GenericFunction,
    Unclassified,
}

impl Category {
    /// Every category, in classification-rule order
    pub const ALL: [Category; 6] = [
        Category::RestController,
        Category::WebRoute,
        Category::ReactiveUi,
        Category::SqlQuery,
        Category::GenericFunction,
        Category::Unclassified,
    ];

    /// Stable machine label
    pub fn label(self) -> &'static str {
        match self {
            Category::RestController => "rest-controller",
            Category::WebRoute => "web-route",
            Category::ReactiveUi => "reactive-ui",
            Category::SqlQuery => "sql-query",
            Category::GenericFunction => "generic-function",
            Category::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Code improvement suggestion
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Improvement {
    pub title: String,
    pub description: String,
    pub suggested_code: String,
    pub confidence: f32, // 0.0 to 1.0
}

impl Improvement {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        suggested_code: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            suggested_code: suggested_code.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Structured analysis handed to the presentation layer.
///
/// Both the synthesizer and the remote client produce exactly this shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResult {
    pub explanation: String,
    pub improvements: Vec<Improvement>,
    pub potential_bugs: Vec<String>,
}

/// Everything sent to the remote model for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub file_type: String,
    pub project_summary: String,
    pub surrounding_context: String,
}

impl AnalysisRequest {
    pub fn new(
        code: impl Into<String>,
        file_type: impl Into<String>,
        project_summary: impl Into<String>,
        surrounding_context: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            file_type: file_type.into(),
            project_summary: project_summary.into(),
            surrounding_context: surrounding_context.into(),
        }
    }
}

/// File counts per language label. Never holds a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageHistogram {
    counts: BTreeMap<String, usize>,
}

impl LanguageHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more file for `language`
    pub fn record(&mut self, language: impl Into<String>) {
        *self.counts.entry(language.into()).or_insert(0) += 1;
    }

    pub fn count(&self, language: &str) -> usize {
        self.counts.get(language).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Languages by descending count, ties broken by label
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(language, count)| (language.as_str(), *count))
            .collect();

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_ranking() {
        let mut histogram = LanguageHistogram::new();
        histogram.record("Rust");
        histogram.record("Rust");
        histogram.record("Python");
        histogram.record("Go");

        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.count("Rust"), 2);
        assert_eq!(histogram.count("Java"), 0);
        assert_eq!(
            histogram.ranked(),
            vec![("Rust", 2), ("Go", 1), ("Python", 1)]
        );
    }

    #[test]
    fn test_improvement_confidence_is_clamped() {
        let improvement = Improvement::new("t", "d", "c", 1.7);
        assert_eq!(improvement.confidence, 1.0);
    }

    #[test]
    fn test_category_labels_are_unique() {
        let mut labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Category::ALL.len());
    }
}
