//! Remote collaborators / 원격 연동
//!
//! - `DataSource`: fetch and save the whole dataset
//! - `InsightProvider`: ask the AI service to summarize the top results
//!
//! Both are single-request operations without cancellation. Failures are
//! returned to the controller, which turns them into user notices.

mod http;

pub use http::{ApiClient, HttpDataSource, HttpInsightProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Entry;

/// Most entries sent to the AI service as context
pub const CONTEXT_LIMIT: usize = 50;

/// Dataset source interface / 데이터 원본 인터페이스
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch raw records, coerced later by `models::load`
    async fn fetch(&self) -> Result<Value>;

    /// Persist the full collection, returns the service's confirmation message
    async fn save(&self, entries: &[Entry]) -> Result<String>;
}

/// AI summary interface / AI 요약 인터페이스
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn ask(&self, query: &str, context: &[Entry]) -> Result<String>;
}

/// Save reply: `{success, message}` or `{error}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn into_result(self) -> Result<String> {
        if self.success {
            Ok(self.message.unwrap_or_default())
        } else {
            Err(Error::Remote(
                self.error.unwrap_or_else(|| "Save failed".to_string()),
            ))
        }
    }
}

/// AI request body
#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub query: &'a str,
    pub context: &'a [Entry],
}

/// AI reply: `{answer}` or `{error}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AskResponse {
    pub fn into_result(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(Error::Remote(error));
        }
        self.answer
            .ok_or_else(|| Error::Remote("AI service returned no answer".to_string()))
    }
}

/// Pull `error` out of a failed response body, if it carries one
pub(crate) fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(Value::as_str).map(str::to_string)
}
