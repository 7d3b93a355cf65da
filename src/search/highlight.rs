//! Term highlighting / 검색어 강조
//!
//! Each term is applied in query order as one global case-insensitive match
//! over the output of the previous terms. Later terms therefore also see the
//! marker text inserted by earlier ones: overlapping terms, or a term that
//! occurs inside the marker itself (`mark`), produce nested markers. That is
//! the intended display behavior and is kept as is.
//!
//! The result is display markup. Never feed it back into plain-text matching.

use regex::{Captures, RegexBuilder};

/// Opening/closing pair wrapped around each match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub open: String,
    pub close: String,
}

impl Marker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

/// Highlight with the default `<mark>` marker
pub fn highlight(text: &str, terms: &[String]) -> String {
    highlight_with(text, terms, &Marker::default())
}

/// Wrap every case-insensitive occurrence of each term / 검색어를 마커로 감싸기
///
/// Terms are matched literally; regex metacharacters carry no meaning.
pub fn highlight_with(text: &str, terms: &[String], marker: &Marker) -> String {
    if terms.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let mut highlighted = text.to_string();
    for term in terms {
        if term.is_empty() {
            continue;
        }
        let pattern = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::debug!("Skipping highlight term {:?}: {}", term, e);
                continue;
            }
        };
        highlighted = pattern
            .replace_all(&highlighted, |caps: &Captures| {
                format!("{}{}{}", marker.open, &caps[0], marker.close)
            })
            .into_owned();
    }
    highlighted
}
