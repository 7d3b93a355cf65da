//! Search engine - in-memory filter/sort/highlight / 검색 엔진
//!
//! Architecture principle: only expose primitive operations, never own data
//! - search: tokenize + filter + sort over a borrowed collection
//! - highlight: mark the terms of the last search inside display text

use super::collation::sort_by_question;
use super::highlight::{highlight_with, Marker};
use super::schema::{Combinator, SearchMode, SearchOptions, SearchOutcome};
use super::tokenizer::tokenize;
use crate::models::Entry;

/// Search engine / 검색 엔진
///
/// Holds only the display marker; every search works on the collection it
/// is handed and returns a fresh view.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    marker: Marker,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(marker: Marker) -> Self {
        Self { marker }
    }

    /// Search (primitive operation) / 검색
    ///
    /// A blank query returns the whole collection, still sorted, with no
    /// highlight terms.
    pub fn search(&self, collection: &[Entry], options: &SearchOptions) -> SearchOutcome {
        let terms = tokenize(&options.query);

        let mut view = if terms.is_empty() {
            collection.to_vec()
        } else {
            filter(collection, &terms, options.mode)
        };

        // 정렬은 필터 유무와 관계없이 매번 수행
        sort_by_question(&mut view);

        tracing::debug!(
            "Search {:?} ({}) matched {}/{}",
            options.query,
            options.mode,
            view.len(),
            collection.len()
        );

        SearchOutcome { view, terms }
    }

    /// Highlight search terms in display text
    pub fn highlight(&self, text: &str, terms: &[String]) -> String {
        highlight_with(text, terms, &self.marker)
    }
}

/// Keep entries satisfying the AND/OR predicate, in encounter order / 필터링
pub fn filter(collection: &[Entry], tokens: &[String], mode: SearchMode) -> Vec<Entry> {
    collection
        .iter()
        .filter(|entry| matches(entry, tokens, mode))
        .cloned()
        .collect()
}

/// Case-insensitive substring test of every (AND) or any (OR) token
pub fn matches(entry: &Entry, tokens: &[String], mode: SearchMode) -> bool {
    let target = mode.field.text(entry).to_lowercase();
    match mode.combinator {
        Combinator::And => tokens.iter().all(|token| target.contains(token.as_str())),
        Combinator::Or => tokens.iter().any(|token| target.contains(token.as_str())),
    }
}
