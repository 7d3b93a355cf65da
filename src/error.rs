//! Error types / 오류 타입
//!
//! The dataset store and the search engine never fail; every variant here
//! comes from a collaborator (remote API, local storage) or from input
//! validation in the controller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error message reported by the remote API itself
    #[error("{0}")]
    Remote(String),

    #[error("No search results. Run a search first.")]
    NoResults,

    #[error("Question and answer must not be empty")]
    EmptyField,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
