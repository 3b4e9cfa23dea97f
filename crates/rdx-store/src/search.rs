//! Client-side search over the current page.
//!
//! Pure and synchronous: recomputed from state on demand, never persisted.
//! Matching is case- and accent-insensitive so "helene" finds "Hélène".

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::UserRecord;

/// Fold a string for matching: lowercase, then NFD-decompose and strip
/// combining marks. Punctuation and whitespace are kept so email addresses
/// match verbatim.
pub fn fold_for_search(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Whether a record matches the folded search needle.
fn matches(record: &UserRecord, needle: &str) -> bool {
    fold_for_search(&record.name).contains(needle)
        || fold_for_search(&record.email).contains(needle)
        || fold_for_search(record.role.as_str()).contains(needle)
}

/// The order-preserving subsequence of `records` matching `term`.
///
/// An empty or whitespace-only term returns all records.
pub fn filter_users(records: &[UserRecord], term: &str) -> Vec<UserRecord> {
    let needle = fold_for_search(term.trim());
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches(record, &needle))
        .cloned()
        .collect()
}
