//! Project-level language summary
//!
//! Walks the project tree to a bounded depth, counts files per language and
//! renders the short summary that is sent to the remote model as context.

use explainer_shared::{FilesystemError, LanguageHistogram, SummaryConfig};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Returned when the walk finds no regular files
pub const NO_FILES_SUMMARY: &str = "No files found to analyze";

/// Label for files without an extension
pub const NO_EXTENSION: &str = "no_extension";

/// Summarizes the languages used in a project
#[derive(Debug, Clone)]
pub struct ProjectSummarizer {
    max_depth: usize,
    top_languages: usize,
}

impl Default for ProjectSummarizer {
    fn default() -> Self {
        Self::new(&SummaryConfig::default())
    }
}

impl ProjectSummarizer {
    /// Create a summarizer from configuration
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            top_languages: config.top_languages.max(1),
        }
    }

    /// Count regular files per language under `root`.
    ///
    /// Unreadable entries are skipped; a missing root yields an empty histogram.
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub fn histogram(&self, root: &Path) -> LanguageHistogram {
        let mut histogram = LanguageHistogram::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let error = FilesystemError {
                        path: e
                            .path()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| root.display().to_string()),
                        message: e.to_string(),
                    };
                    debug!("Skipping entry: {}", error);
                    skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_file() {
                histogram.record(language_for_path(entry.path()));
            }
        }

        debug!(
            files = histogram.total(),
            languages = histogram.len(),
            skipped,
            "Project walk finished"
        );
        histogram
    }

    /// Render the human-readable project summary
    pub fn summarize(&self, root: &Path) -> String {
        self.render(&self.histogram(root))
    }

    /// Format a histogram: total, then the top languages with floor percentages
    pub fn render(&self, histogram: &LanguageHistogram) -> String {
        let total = histogram.total();
        if total == 0 {
            return NO_FILES_SUMMARY.to_string();
        }

        let mut summary = String::new();
        summary.push_str("📊 Project Analysis:\n");
        let _ = write!(summary, "Total files: {}\n\n", total);
        summary.push_str("Top languages:\n");

        for (language, count) in histogram.ranked().into_iter().take(self.top_languages) {
            let percentage = count * 100 / total;
            let _ = writeln!(summary, "• {}: {} files ({}%)", language, count, percentage);
        }

        summary
    }
}

/// Language label for a file path
pub fn language_for_path(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => language_for_extension(ext),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Map an extension to a language label; unknown extensions pass through raw
pub fn language_for_extension(extension: &str) -> String {
    let label = match extension.to_lowercase().as_str() {
        "kt" | "kts" => "Kotlin",
        "java" => "Java",
        "py" => "Python",
        "js" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "go" => "Go",
        "rs" => "Rust",
        "cpp" | "cc" | "cxx" | "hpp" | "h" => "C++",
        "c" => "C",
        "swift" => "Swift",
        "rb" => "Ruby",
        "php" => "PHP",
        "cs" => "C#",
        "scala" => "Scala",
        "groovy" => "Groovy",
        "gradle" => "Gradle",
        "xml" | "json" | "yaml" | "yml" | "properties" => "Config",
        "md" | "txt" | "rst" => "Documentation",
        _ => return extension.to_string(),
    };
    label.to_string()
}
