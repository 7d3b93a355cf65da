//! Recent search keywords / 최근 검색어
//!
//! Most-recent-first, deduplicated by exact string equality, bounded. A
//! keyword that is already cached keeps its position.

use std::collections::VecDeque;

/// Local storage key the cache lives under
pub const STORAGE_KEY: &str = "searchKeywords";

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentKeywords {
    items: VecDeque<String>,
    capacity: usize,
}

impl RecentKeywords {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Restore from stored JSON; anything malformed yields an empty cache
    pub fn from_json(content: &str, capacity: usize) -> Self {
        let mut keywords = Self::with_capacity(capacity);
        match serde_json::from_str::<Vec<String>>(content) {
            Ok(items) => {
                keywords.items = items
                    .into_iter()
                    .filter(|k| !k.is_empty())
                    .take(capacity)
                    .collect();
            }
            Err(e) => {
                tracing::warn!("Resetting malformed keyword cache: {}", e);
            }
        }
        keywords
    }

    pub fn to_json(&self) -> String {
        let items: Vec<&String> = self.items.iter().collect();
        serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Insert at the front unless already present / 최근 검색어 추가
    ///
    /// Returns `true` when the cache changed and should be persisted.
    pub fn record(&mut self, query: &str) -> bool {
        if query.is_empty() || self.capacity == 0 || self.contains(query) {
            return false;
        }
        self.items.push_front(query.to_string());
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
        true
    }

    pub fn contains(&self, query: &str) -> bool {
        self.items.iter().any(|k| k == query)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for RecentKeywords {
    fn default() -> Self {
        Self::new()
    }
}
