//! Dataset store / 데이터셋 저장소
//!
//! Owns the full entry collection. Entries are addressed by their current
//! question text; lookups resolve to the first match. The store performs no
//! I/O, persistence is the controller's job.

use serde_json::Value;

use crate::models::{self, Entry};

#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    entries: Vec<Entry>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Replace the collection with coerced raw records, returns the kept count
    pub fn load(&mut self, raw: &Value) -> usize {
        self.replace(models::load(raw));
        self.entries.len()
    }

    pub fn replace(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose question equals `key`
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.question == key)
    }

    /// Append a new entry. Duplicate questions are allowed.
    ///
    /// Returns `false` (and stores nothing) when either field is blank.
    pub fn add(&mut self, question: &str, answer: &str) -> bool {
        match Entry::normalized(question, answer) {
            Some(entry) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Rewrite the first entry whose question equals `key` in place / 항목 수정
    ///
    /// A missing key or a blank replacement leaves the collection untouched.
    pub fn update(&mut self, key: &str, question: &str, answer: &str) -> bool {
        let Some(replacement) = Entry::normalized(question, answer) else {
            return false;
        };
        match self.entries.iter_mut().find(|e| e.question == key) {
            Some(entry) => {
                *entry = replacement;
                true
            }
            None => false,
        }
    }

    /// Remove every entry whose question equals `key`, returns how many went
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.question != key);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DatasetStore {
        DatasetStore::from_entries(vec![
            Entry::new("What is AI?", "Artificial Intelligence"),
            Entry::new("What is ML?", "Machine Learning"),
            Entry::new("What is AI?", "A second answer"),
        ])
    }

    #[test]
    fn test_load_replaces_collection() {
        let mut store = sample();
        let kept = store.load(&json!([
            {"instruction": "q", "output": ""},
            {"instruction": "q2", "output": "a2"}
        ]));
        assert_eq!(kept, 1);
        assert_eq!(store.entries(), &[Entry::new("q2", "a2")]);
    }

    #[test]
    fn test_add_allows_duplicates() {
        let mut store = sample();
        assert!(store.add("What is ML?", "again"));
        assert_eq!(store.len(), 4);
        assert_eq!(store.entries()[3], Entry::new("What is ML?", "again"));
    }

    #[test]
    fn test_add_rejects_blank() {
        let mut store = DatasetStore::new();
        assert!(!store.add("  ", "answer"));
        assert!(!store.add("question", ""));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_first_match_only() {
        let mut store = sample();
        assert!(store.update("What is AI?", " What is A.I.? ", "AI"));
        assert_eq!(store.entries()[0], Entry::new("What is A.I.?", "AI"));
        // the duplicate further down is untouched
        assert_eq!(store.entries()[2], Entry::new("What is AI?", "A second answer"));
    }

    #[test]
    fn test_missing_key_is_noop() {
        let mut store = sample();
        let before = store.entries().to_vec();
        assert!(!store.update("missing-key", "q", "a"));
        assert_eq!(store.remove("missing-key"), 0);
        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_update_with_blank_answer_is_noop() {
        let mut store = sample();
        assert!(!store.update("What is ML?", "What is ML?", "   "));
        assert_eq!(store.find("What is ML?").unwrap().answer, "Machine Learning");
    }

    #[test]
    fn test_remove_all_matches() {
        let mut store = sample();
        assert_eq!(store.remove("What is AI?"), 2);
        assert_eq!(store.entries(), &[Entry::new("What is ML?", "Machine Learning")]);
    }

    #[test]
    fn test_find_returns_first() {
        let store = sample();
        assert_eq!(store.find("What is AI?").unwrap().answer, "Artificial Intelligence");
        assert!(store.find("what is ai?").is_none());
    }
}
