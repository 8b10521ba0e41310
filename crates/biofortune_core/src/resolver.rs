//! crates/biofortune_core/src/resolver.rs
//!
//! Maps free-text symptom descriptions onto the local catalog.
//!
//! Matching is plain case-insensitive substring containment. There is no
//! tokenizing, so a keyword can match inside an unrelated word.

use crate::catalog::{entries_by_match_priority, CRITICAL_KEYWORDS, CRITICAL_MESSAGE};
use crate::domain::RemedyRecord;

/// The result of resolving one symptom description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A catalog keyword occurs in the text.
    Found {
        keyword: &'static str,
        remedy: &'static RemedyRecord,
    },
    /// No catalog keyword matched but a critical symptom did.
    Critical { message: String },
    NotFound,
}

/// Resolves `text` against the catalog, then the critical list.
///
/// When several catalog keywords occur, the longest one wins; ties go to the
/// keyword defined first.
pub fn resolve(text: &str) -> Outcome {
    let normalized = text.to_lowercase();
    if normalized.trim().is_empty() {
        return Outcome::NotFound;
    }

    if let Some((keyword, remedy)) = entries_by_match_priority()
        .into_iter()
        .find(|(keyword, _)| normalized.contains(keyword))
    {
        return Outcome::Found { keyword, remedy };
    }

    if CRITICAL_KEYWORDS
        .iter()
        .any(|critical| normalized.contains(critical))
    {
        return Outcome::Critical {
            message: CRITICAL_MESSAGE.to_string(),
        };
    }

    Outcome::NotFound
}
