//! Controller / 컨트롤러
//!
//! `App` owns the dataset, the query state and the current view, and talks
//! to its collaborators (remote data, AI, local storage, presenter) through
//! traits. Every mutation of the dataset is followed by a view recompute and
//! a render before anything is persisted.
//!
//! Query state:
//! - idle (`None`): nothing searched yet or search cleared, empty view
//! - blank query: whole dataset, sorted, nothing highlighted
//! - otherwise: filtered and sorted view with highlight terms

use chrono::Local;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::keywords::{self, RecentKeywords};
use crate::models::{self, Entry};
use crate::presenter::{Notice, Presenter, ResultsView};
use crate::remote::{DataSource, InsightProvider, CONTEXT_LIMIT};
use crate::search::{SearchEngine, SearchMode, SearchOptions};
use crate::storage::{KeyValueStore, DATASET_KEY};
use crate::store::DatasetStore;

/// External collaborators the controller drives
pub struct Collaborators {
    pub source: Box<dyn DataSource>,
    pub insight: Box<dyn InsightProvider>,
    pub storage: Box<dyn KeyValueStore>,
    pub presenter: Box<dyn Presenter>,
}

/// Tunables taken from the config file / 컨트롤러 설정
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub mode: SearchMode,
    pub context_limit: usize,
    pub recent_capacity: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            context_limit: CONTEXT_LIMIT,
            recent_capacity: keywords::DEFAULT_CAPACITY,
        }
    }
}

impl From<&AppConfig> for AppSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            mode: config.search_mode(),
            context_limit: config.search.context_limit,
            recent_capacity: config.search.recent_capacity,
        }
    }
}

pub struct App {
    store: DatasetStore,
    engine: SearchEngine,
    /// Raw query as typed, `None` while idle
    query: Option<String>,
    mode: SearchMode,
    view: Vec<Entry>,
    terms: Vec<String>,
    keywords: RecentKeywords,
    context_limit: usize,
    source: Box<dyn DataSource>,
    insight: Box<dyn InsightProvider>,
    storage: Box<dyn KeyValueStore>,
    presenter: Box<dyn Presenter>,
}

impl App {
    /// Create the controller and restore the recent-keyword cache
    pub fn new(parts: Collaborators, settings: AppSettings) -> Self {
        let keywords = match parts.storage.get(keywords::STORAGE_KEY) {
            Ok(Some(content)) => RecentKeywords::from_json(&content, settings.recent_capacity),
            Ok(None) => RecentKeywords::with_capacity(settings.recent_capacity),
            Err(e) => {
                tracing::warn!("Failed to read keyword cache: {}", e);
                RecentKeywords::with_capacity(settings.recent_capacity)
            }
        };

        Self {
            store: DatasetStore::new(),
            engine: SearchEngine::new(),
            query: None,
            mode: settings.mode,
            view: Vec::new(),
            terms: Vec::new(),
            keywords,
            context_limit: settings.context_limit,
            source: parts.source,
            insight: parts.insight,
            storage: parts.storage,
            presenter: parts.presenter,
        }
    }

    // ========== Accessors ==========

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn view(&self) -> &[Entry] {
        &self.view
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn recent_keywords(&self) -> Vec<String> {
        self.keywords.to_vec()
    }

    /// Entry lookup for detail and edit
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.store.find(key)
    }

    // ========== Loading ==========

    /// Restore the local backup, then fetch the remote dataset / 시작
    pub async fn start(&mut self) -> Result<usize> {
        if let Some(count) = self.restore_backup() {
            tracing::info!("Restored {} entries from local backup", count);
            self.recompute();
            self.render();
        }
        self.refresh().await
    }

    fn restore_backup(&mut self) -> Option<usize> {
        let content = match self.storage.get(DATASET_KEY) {
            Ok(content) => content?,
            Err(e) => {
                tracing::warn!("Failed to read dataset backup: {}", e);
                return None;
            }
        };
        match models::parse_lenient(&content) {
            Some(raw) => Some(self.store.load(&raw)),
            None => {
                tracing::warn!("Ignoring unreadable dataset backup");
                None
            }
        }
    }

    /// Replace the dataset with the remote copy / 원격 데이터 새로고침
    ///
    /// On failure the current dataset and view are kept.
    pub async fn refresh(&mut self) -> Result<usize> {
        match self.source.fetch().await {
            Ok(raw) => {
                let count = self.store.load(&raw);
                tracing::info!("Loaded {} entries from remote", count);
                self.recompute();
                self.render();
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch dataset: {}", e);
                self.presenter
                    .notify(Notice::Error(format!("Failed to load data: {}", e)));
                Err(e)
            }
        }
    }

    // ========== Search ==========

    /// Run a query and render the view / 검색 실행
    ///
    /// Non-blank queries are recorded lowercased, otherwise exactly as typed,
    /// in the recent keyword cache.
    pub fn search(&mut self, query: &str, mode: SearchMode) -> usize {
        self.query = Some(query.to_string());
        self.mode = mode;
        self.recompute();
        self.render();

        if !self.terms.is_empty() {
            self.record_keyword(&query.to_lowercase());
        }
        self.view.len()
    }

    /// Change the mode, re-running the active query if there is one
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        if self.query.is_some() {
            self.recompute();
            self.render();
        }
    }

    /// Back to idle: empty view, nothing highlighted / 검색 초기화
    pub fn clear_search(&mut self) {
        self.query = None;
        self.recompute();
        self.render();
    }

    pub fn show_recent_keywords(&mut self) {
        self.presenter.show_keywords(&self.keywords.to_vec());
    }

    fn record_keyword(&mut self, keyword: &str) {
        if !self.keywords.record(keyword) {
            return;
        }
        if let Err(e) = self.storage.set(keywords::STORAGE_KEY, &self.keywords.to_json()) {
            tracing::warn!("Failed to persist keyword cache: {}", e);
        }
    }

    fn recompute(&mut self) {
        match &self.query {
            None => {
                self.view.clear();
                self.terms.clear();
            }
            Some(query) => {
                let options = SearchOptions::new(query.as_str()).mode(self.mode);
                let outcome = self.engine.search(self.store.entries(), &options);
                self.view = outcome.view;
                self.terms = outcome.terms;
            }
        }
    }

    fn render(&mut self) {
        self.presenter.render_results(&ResultsView {
            entries: &self.view,
            terms: &self.terms,
        });
    }

    // ========== Editing ==========

    /// Append an entry, then save / 항목 추가
    pub async fn add(&mut self, question: &str, answer: &str) -> Result<()> {
        if !self.store.add(question, answer) {
            return Err(self.reject(Error::EmptyField));
        }
        self.recompute();
        self.render();
        self.save().await
    }

    /// Rewrite the entry whose question is `key`, then save / 항목 수정
    ///
    /// Returns `Ok(false)` without saving when no entry has that question.
    pub async fn edit(&mut self, key: &str, question: &str, answer: &str) -> Result<bool> {
        if self.store.find(key).is_none() {
            self.presenter
                .notify(Notice::Info(format!("No entry matches \"{}\"", key)));
            return Ok(false);
        }
        if !self.store.update(key, question, answer) {
            return Err(self.reject(Error::EmptyField));
        }
        self.recompute();
        self.render();
        self.save().await?;
        Ok(true)
    }

    /// Remove every entry whose question is `key`, then save / 항목 삭제
    pub async fn delete(&mut self, key: &str) -> Result<usize> {
        let removed = self.store.remove(key);
        if removed == 0 {
            self.presenter
                .notify(Notice::Info(format!("No entry matches \"{}\"", key)));
            return Ok(0);
        }
        self.recompute();
        self.render();
        self.save().await?;
        Ok(removed)
    }

    /// Back up locally, then push the whole dataset to the remote / 저장
    ///
    /// A failed remote save keeps the in-memory state.
    pub async fn save(&mut self) -> Result<()> {
        match serde_json::to_string(self.store.entries()) {
            Ok(content) => {
                if let Err(e) = self.storage.set(DATASET_KEY, &content) {
                    tracing::warn!("Failed to write dataset backup: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize dataset backup: {}", e),
        }

        match self.source.save(self.store.entries()).await {
            Ok(message) => {
                tracing::info!(
                    "Saved {} entries at {}",
                    self.store.len(),
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                );
                self.presenter.notify(Notice::Saved(message));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to save dataset: {}", e);
                self.presenter
                    .notify(Notice::Error(format!("Failed to save: {}", e)));
                Err(e)
            }
        }
    }

    // ========== Detail / AI ==========

    /// Show one entry in full, highlighted with the active terms
    pub fn detail(&mut self, key: &str) -> bool {
        match self.store.find(key) {
            Some(entry) => {
                self.presenter.show_detail(entry, &self.terms);
                true
            }
            None => {
                self.presenter
                    .notify(Notice::Info(format!("No entry matches \"{}\"", key)));
                false
            }
        }
    }

    /// Ask the AI service about the top of the current view / AI 요약 요청
    pub async fn ask_ai(&mut self) -> Result<String> {
        if self.view.is_empty() {
            return Err(self.reject(Error::NoResults));
        }
        // blank queries are sent as typed
        let query = self.query.clone().unwrap_or_default();

        let context = &self.view[..self.view.len().min(self.context_limit)];
        self.presenter.notify(Notice::Info(format!(
            "Asking AI about {} entries...",
            context.len()
        )));
        tracing::debug!("Asking AI {:?} with {} context entries", query, context.len());

        match self.insight.ask(&query, context).await {
            Ok(answer) => {
                self.presenter.show_answer(&answer);
                Ok(answer)
            }
            Err(e) => {
                tracing::warn!("AI request failed: {}", e);
                self.presenter
                    .notify(Notice::Error(format!("AI request failed: {}", e)));
                Err(e)
            }
        }
    }

    fn reject(&mut self, error: Error) -> Error {
        self.presenter.notify(Notice::Error(error.to_string()));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Results(Vec<String>, Vec<String>),
        Detail(String, Vec<String>),
        Answer(String),
        Keywords(Vec<String>),
        Notice(Notice),
    }

    #[derive(Clone, Default)]
    struct RecordingPresenter {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl RecordingPresenter {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.events.lock())
        }
    }

    impl Presenter for RecordingPresenter {
        fn render_results(&mut self, view: &ResultsView<'_>) {
            let questions = view.entries.iter().map(|e| e.question.clone()).collect();
            self.events
                .lock()
                .push(Event::Results(questions, view.terms.to_vec()));
        }

        fn show_detail(&mut self, entry: &Entry, terms: &[String]) {
            self.events
                .lock()
                .push(Event::Detail(entry.question.clone(), terms.to_vec()));
        }

        fn show_answer(&mut self, answer: &str) {
            self.events.lock().push(Event::Answer(answer.to_string()));
        }

        fn show_keywords(&mut self, keywords: &[String]) {
            self.events.lock().push(Event::Keywords(keywords.to_vec()));
        }

        fn notify(&mut self, notice: Notice) {
            self.events.lock().push(Event::Notice(notice));
        }
    }

    #[derive(Clone, Default)]
    struct FakeSource {
        data: Arc<Mutex<Option<Value>>>,
        saved: Arc<Mutex<Vec<Vec<Entry>>>>,
        fail_save: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl DataSource for FakeSource {
        async fn fetch(&self) -> Result<Value> {
            self.data
                .lock()
                .clone()
                .ok_or_else(|| Error::Remote("connection refused".to_string()))
        }

        async fn save(&self, entries: &[Entry]) -> Result<String> {
            if *self.fail_save.lock() {
                return Err(Error::Remote("disk full".to_string()));
            }
            self.saved.lock().push(entries.to_vec());
            Ok(format!("{} items saved", entries.len()))
        }
    }

    #[derive(Clone, Default)]
    struct FakeInsight {
        requests: Arc<Mutex<Vec<(String, usize)>>>,
        fail: bool,
    }

    #[async_trait]
    impl InsightProvider for FakeInsight {
        async fn ask(&self, query: &str, context: &[Entry]) -> Result<String> {
            self.requests.lock().push((query.to_string(), context.len()));
            if self.fail {
                return Err(Error::Remote("model offline".to_string()));
            }
            Ok(format!("**{}** summary", query))
        }
    }

    struct Harness {
        app: App,
        presenter: RecordingPresenter,
        source: FakeSource,
        insight: FakeInsight,
        storage: Arc<MemoryStore>,
    }

    fn harness_with(data: Option<Value>, storage: Arc<MemoryStore>, insight: FakeInsight) -> Harness {
        let presenter = RecordingPresenter::default();
        let source = FakeSource::default();
        *source.data.lock() = data;

        let app = App::new(
            Collaborators {
                source: Box::new(source.clone()),
                insight: Box::new(insight.clone()),
                storage: Box::new(storage.clone()),
                presenter: Box::new(presenter.clone()),
            },
            AppSettings::default(),
        );
        Harness { app, presenter, source, insight, storage }
    }

    fn harness() -> Harness {
        harness_with(
            Some(json!([
                {"instruction": "What is ML?", "output": "Machine Learning"},
                {"instruction": "What is AI?", "output": "Artificial Intelligence"},
                {"instruction": "broken", "output": null},
                {"instruction": "사과란?", "output": "빨간 과일"}
            ])),
            Arc::new(MemoryStore::new()),
            FakeInsight::default(),
        )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn question_mode() -> SearchMode {
        SearchMode::parse("question_or")
    }

    #[tokio::test]
    async fn test_start_loads_remote_and_stays_idle() {
        let mut h = harness();
        assert_eq!(h.app.start().await.unwrap(), 3);
        assert_eq!(h.app.store().len(), 3);
        assert!(h.app.view().is_empty());
        assert_eq!(h.presenter.take(), vec![Event::Results(vec![], vec![])]);
    }

    #[tokio::test]
    async fn test_start_restores_backup_when_remote_fails() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(DATASET_KEY, r#"[{"instruction": "q1", "output": "a1"},]"#)
            .unwrap();
        let mut h = harness_with(None, storage, FakeInsight::default());

        assert!(h.app.start().await.is_err());
        assert_eq!(h.app.store().entries(), &[Entry::new("q1", "a1")]);

        let events = h.presenter.take();
        assert_eq!(events[0], Event::Results(vec![], vec![]));
        assert!(matches!(&events[1], Event::Notice(Notice::Error(m)) if m.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_search_filters_sorts_and_records_keyword() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.presenter.take();

        assert_eq!(h.app.search("What", question_mode()), 2);
        assert_eq!(
            h.presenter.take(),
            vec![Event::Results(strings(&["What is AI?", "What is ML?"]), strings(&["what"]))]
        );
        assert_eq!(h.app.recent_keywords(), strings(&["what"]));
        assert_eq!(
            h.storage.get(keywords::STORAGE_KEY).unwrap().as_deref(),
            Some(r#"["what"]"#)
        );
    }

    #[tokio::test]
    async fn test_keyword_is_lowercased_not_trimmed() {
        let mut h = harness();
        h.app.start().await.unwrap();

        h.app.search("AI", question_mode());
        h.app.search(" ai", question_mode());
        h.app.search("ai", question_mode());
        assert_eq!(h.app.recent_keywords(), strings(&[" ai", "ai"]));
    }

    #[tokio::test]
    async fn test_blank_search_shows_everything_without_recording() {
        let mut h = harness();
        h.app.start().await.unwrap();

        assert_eq!(h.app.search("   ", question_mode()), 3);
        assert!(h.app.terms().is_empty());
        assert!(h.app.recent_keywords().is_empty());
    }

    #[tokio::test]
    async fn test_keywords_restored_from_storage() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keywords::STORAGE_KEY, r#"["ml","ai"]"#).unwrap();
        let mut h = harness_with(None, storage, FakeInsight::default());

        h.app.show_recent_keywords();
        assert_eq!(h.presenter.take(), vec![Event::Keywords(strings(&["ml", "ai"]))]);

        // already cached, position unchanged
        h.app.search("AI", question_mode());
        assert_eq!(h.app.recent_keywords(), strings(&["ml", "ai"]));
    }

    #[tokio::test]
    async fn test_set_mode_reruns_active_query() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("learning", question_mode());
        assert!(h.app.view().is_empty());

        h.app.set_mode(SearchMode::parse("answer_or"));
        assert_eq!(h.app.view(), &[Entry::new("What is ML?", "Machine Learning")]);
    }

    #[tokio::test]
    async fn test_clear_search_goes_idle() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("ai", question_mode());
        h.app.clear_search();

        assert_eq!(h.app.query(), None);
        assert!(h.app.view().is_empty());
        assert!(h.app.terms().is_empty());
    }

    #[tokio::test]
    async fn test_add_recomputes_then_saves() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("what", question_mode());
        h.presenter.take();

        h.app.add(" What is DL? ", "Deep Learning").await.unwrap();

        assert_eq!(
            h.app.view().iter().map(|e| e.question.as_str()).collect::<Vec<_>>(),
            vec!["What is AI?", "What is DL?", "What is ML?"]
        );
        let events = h.presenter.take();
        assert!(matches!(&events[0], Event::Results(q, _) if q.len() == 3));
        assert_eq!(events[1], Event::Notice(Notice::Saved("4 items saved".to_string())));

        assert_eq!(h.source.saved.lock().len(), 1);
        let backup = h.storage.get(DATASET_KEY).unwrap().unwrap();
        assert!(backup.contains(r#""instruction":"What is DL?""#));
    }

    #[tokio::test]
    async fn test_add_blank_is_rejected() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.presenter.take();

        assert!(matches!(h.app.add("q", "  ").await, Err(Error::EmptyField)));
        assert_eq!(h.app.store().len(), 3);
        assert!(h.source.saved.lock().is_empty());
        assert!(matches!(&h.presenter.take()[..], [Event::Notice(Notice::Error(_))]));
    }

    #[tokio::test]
    async fn test_edit_and_missing_key() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("what", question_mode());

        assert!(h.app.edit("What is ML?", "What is ML?", "ML").await.unwrap());
        assert_eq!(h.app.entry("What is ML?").unwrap().answer, "ML");
        assert_eq!(h.app.view()[1], Entry::new("What is ML?", "ML"));

        assert!(!h.app.edit("missing", "q", "a").await.unwrap());
        assert_eq!(h.source.saved.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_from_view() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("what", question_mode());

        assert_eq!(h.app.delete("What is AI?").await.unwrap(), 1);
        assert_eq!(h.app.view(), &[Entry::new("What is ML?", "Machine Learning")]);
        assert_eq!(h.app.delete("What is AI?").await.unwrap(), 0);
        assert_eq!(h.source.saved.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_state() {
        let mut h = harness();
        h.app.start().await.unwrap();
        *h.source.fail_save.lock() = true;
        h.presenter.take();

        assert!(h.app.add("new", "entry").await.is_err());
        assert_eq!(h.app.store().len(), 4);
        let events = h.presenter.take();
        assert!(matches!(events.last(), Some(Event::Notice(Notice::Error(m))) if m.contains("disk full")));
        // the local backup is still written
        assert!(h.storage.get(DATASET_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_detail_uses_active_terms() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("ai", question_mode());
        h.presenter.take();

        assert!(h.app.detail("What is AI?"));
        assert!(!h.app.detail("nope"));
        let events = h.presenter.take();
        assert_eq!(events[0], Event::Detail("What is AI?".to_string(), strings(&["ai"])));
        assert!(matches!(&events[1], Event::Notice(Notice::Info(_))));
    }

    #[tokio::test]
    async fn test_ask_ai_requires_results() {
        let mut h = harness();
        h.app.start().await.unwrap();

        assert!(matches!(h.app.ask_ai().await, Err(Error::NoResults)));
        h.app.search("quantum", question_mode());
        assert!(matches!(h.app.ask_ai().await, Err(Error::NoResults)));
        assert!(h.insight.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_ask_ai_with_blank_query_sends_everything() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search(" ", question_mode());

        assert_eq!(h.app.ask_ai().await.unwrap(), "** ** summary");
        assert_eq!(h.insight.requests.lock().as_slice(), &[(" ".to_string(), 3)]);
    }

    #[tokio::test]
    async fn test_ask_ai_sends_top_entries() {
        let records: Vec<Value> = (0..60)
            .map(|i| json!({"instruction": format!("question {:02}", i), "output": "answer"}))
            .collect();
        let mut h = harness_with(
            Some(Value::Array(records)),
            Arc::new(MemoryStore::new()),
            FakeInsight::default(),
        );
        h.app.start().await.unwrap();
        h.app.search("Question", question_mode());
        h.presenter.take();

        let answer = h.app.ask_ai().await.unwrap();
        assert_eq!(answer, "**Question** summary");
        assert_eq!(h.insight.requests.lock().as_slice(), &[("Question".to_string(), 50)]);
        assert_eq!(
            h.presenter.take().last(),
            Some(&Event::Answer("**Question** summary".to_string()))
        );
    }

    #[tokio::test]
    async fn test_ask_ai_failure_is_notified() {
        let insight = FakeInsight { fail: true, ..FakeInsight::default() };
        let mut h = harness_with(
            Some(json!([{"instruction": "q", "output": "a"}])),
            Arc::new(MemoryStore::new()),
            insight,
        );
        h.app.start().await.unwrap();
        h.app.search("q", question_mode());
        h.presenter.take();

        assert!(h.app.ask_ai().await.is_err());
        assert!(matches!(
            h.presenter.take().last(),
            Some(Event::Notice(Notice::Error(m))) if m.contains("model offline")
        ));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_dataset() {
        let mut h = harness();
        h.app.start().await.unwrap();
        h.app.search("what", question_mode());
        *h.source.data.lock() = None;

        assert!(h.app.refresh().await.is_err());
        assert_eq!(h.app.store().len(), 3);
        assert_eq!(h.app.view().len(), 2);
    }
}
