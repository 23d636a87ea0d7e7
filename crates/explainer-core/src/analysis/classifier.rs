//! Substring-based snippet classification
//!
//! The rules are data: an ordered table of needles per category. The first
//! rule with any matching needle wins, so framework-specific categories must
//! stay ahead of the generic ones.

use explainer_shared::Category;
use tracing::trace;

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub category: Category,
    /// Lower-case substrings, any of which selects `category`
    pub needles: &'static [&'static str],
}

/// Ordered rule table. Anything that matches no rule is `Unclassified`.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: Category::RestController,
        needles: &["@restcontroller", "@getmapping"],
    },
    ClassificationRule {
        category: Category::WebRoute,
        needles: &["flask", "@app.route"],
    },
    ClassificationRule {
        category: Category::ReactiveUi,
        needles: &["usestate", "useeffect", "react"],
    },
    ClassificationRule {
        category: Category::SqlQuery,
        needles: &["select", "insert", "create table"],
    },
    ClassificationRule {
        category: Category::GenericFunction,
        needles: &["function", "def ", "public "],
    },
];

impl ClassificationRule {
    fn matches(&self, lowered: &str) -> bool {
        self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

/// Assign `code` to exactly one category
pub fn classify(code: &str, file_type: &str) -> Category {
    let lowered = code.to_lowercase();

    let category = CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(Category::Unclassified);

    trace!(%category, file_type, "snippet classified");
    category
}
