//! Client side of the search service's REST interface.
//!
//! The [`SearchApi`] trait covers the three operations the service exposes:
//!
//! | Operation | Request |
//! |---|---|
//! | [`SearchApi::search`] | `POST {base}/pesquisa/` with `{"termo": ...}` |
//! | [`SearchApi::history`] | `GET {base}/historico/` |
//! | [`SearchApi::get`] | `GET {base}/pesquisas/{id}/` |
//!
//! [`HttpSearchApi`] talks to a live service; [`MockSearchApi`] is an
//! in-memory double used by the view tests.

mod http;
pub mod mock;

pub use http::{HttpSearchApi, DEFAULT_BASE_URL};
pub use mock::{ApiCall, MockSearchApi};

use crate::models::{SearchInput, SearchResult};
use async_trait::async_trait;

/// Operations offered by the search service.
///
/// Implementations perform exactly one request per call: no retries,
/// no caching, no de-duplication of concurrent calls.
#[async_trait]
pub trait SearchApi: Send + Sync + std::fmt::Debug {
    /// Run a search and return the stored result
    async fn search(&self, input: &SearchInput) -> Result<SearchResult, ApiError>;

    /// List previous searches in the order the service returns them
    async fn history(&self) -> Result<Vec<SearchResult>, ApiError>;

    /// Fetch a single stored search by identifier
    async fn get(&self, id: i64) -> Result<SearchResult, ApiError>;
}

/// Errors that can occur when talking to the search service
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response; `body` holds the payload when it was JSON
    #[error("Server returned status {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// Connection, DNS, TLS or body transfer failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured base address cannot be used
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// First message the service attached to `field` in a validation
    /// error body (`{"<field>": ["message", ...]}`).
    ///
    /// Any other body shape yields `None`.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body.get(field)?.get(0)?.as_str(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
