//! Surrounding-context extraction for the remote prompt

use std::path::Path;
use tracing::debug;

/// Number of import lines forwarded to the model
pub const MAX_IMPORT_LINES: usize = 5;

const IMPORT_PREFIXES: &[&str] = &["import ", "package ", "use "];

/// Build the context block from the source text that encloses the snippet.
///
/// Returns an empty string when the file has no top-level imports.
pub fn surrounding_context(source: &str) -> String {
    let imports: Vec<&str> = source
        .lines()
        .filter(|line| IMPORT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)))
        .take(MAX_IMPORT_LINES)
        .collect();

    if imports.is_empty() {
        return String::new();
    }

    format!("Imports:\n{}\n\n", imports.join("\n"))
}

/// Read `path` and extract its context; unreadable files give no context
pub async fn surrounding_context_from_file(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => surrounding_context(&source),
        Err(e) => {
            debug!("Cannot read {} for context: {}", path.display(), e);
            String::new()
        }
    }
}
