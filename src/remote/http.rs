//! HTTP adapters for the data and AI endpoints / HTTP 클라이언트
//!
//! - `GET  {base}/api/data`: raw record array
//! - `POST {base}/api/data`: full collection, replies `{success, message}` or `{error}`
//! - `POST {base}/api/ask`: `{query, context}`, replies `{answer}` or `{error}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::{error_message, AskRequest, AskResponse, DataSource, InsightProvider, SaveResponse};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::models::Entry;

const DEFAULT_USER_AGENT: &str = concat!("knowledge-finder/", env!("CARGO_PKG_VERSION"));

const DATA_PATH: &str = "api/data";
const ASK_PATH: &str = "api/ask";

/// Shared HTTP client bound to the service base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    ask_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base: parse_base(&config.base_url)?,
            ask_timeout: Duration::from_secs(config.ask_timeout_secs),
        })
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }
}

/// Base URLs are treated as directories so `join` appends instead of replacing
fn parse_base(base: &str) -> Result<Url> {
    let base = base.trim();
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{}/", base))?)
    }
}

/// Message for a non-2xx reply: the body's `error` field if any, else the status
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Remote dataset over HTTP / HTTP 데이터 원본
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    api: ApiClient,
}

impl HttpDataSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self) -> Result<Value> {
        let url = self.api.endpoint(DATA_PATH)?;
        let response = self.api.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Remote(failure_message(status, &body)));
        }

        let value: Value = serde_json::from_str(&body)?;
        tracing::debug!(
            "Fetched dataset: {} raw records",
            value.as_array().map_or(0, Vec::len)
        );
        Ok(value)
    }

    async fn save(&self, entries: &[Entry]) -> Result<String> {
        let url = self.api.endpoint(DATA_PATH)?;
        let response = self.api.client.post(url).json(entries).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<SaveResponse>(&body) {
            Ok(reply) => reply.into_result(),
            Err(_) if !status.is_success() => Err(Error::Remote(failure_message(status, &body))),
            Err(e) => Err(e.into()),
        }
    }
}

/// AI summaries over HTTP / HTTP AI 요약
#[derive(Debug, Clone)]
pub struct HttpInsightProvider {
    api: ApiClient,
}

impl HttpInsightProvider {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl InsightProvider for HttpInsightProvider {
    async fn ask(&self, query: &str, context: &[Entry]) -> Result<String> {
        let url = self.api.endpoint(ASK_PATH)?;
        let response = self
            .api
            .client
            .post(url)
            .timeout(self.api.ask_timeout)
            .json(&AskRequest { query, context })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<AskResponse>(&body) {
            Ok(reply) => reply.into_result(),
            Err(_) if !status.is_success() => Err(Error::Remote(failure_message(status, &body))),
            Err(e) => Err(e.into()),
        }
    }
}
