//! reqwest-backed implementation of [`SearchApi`].

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::{ApiError, SearchApi};
use crate::models::{SearchInput, SearchResult};
use crate::utils::HttpClient;

/// Default address of the search service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Search service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: HttpClient,
    base_url: Url,
}

impl HttpSearchApi {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let client = HttpClient::with_timeout(timeout)?;
        Self::with_client(client, base_url)
    }

    /// Use an existing HTTP client
    pub fn with_client(client: HttpClient, base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request and decode a JSON success body
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // a validation error carries its messages in a JSON body
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: serde_json::from_str(&text).ok(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Parse the base address, making sure relative joins stay beneath it
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme: {}",
                other
            )))
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, input: &SearchInput) -> Result<SearchResult, ApiError> {
        let url = self.endpoint("pesquisa/")?;
        tracing::debug!(%url, term = %input.term, "submitting search");

        let request = self.client.client().post(url).json(input);
        self.fetch(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "search request failed");
        })
    }

    async fn history(&self) -> Result<Vec<SearchResult>, ApiError> {
        let url = self.endpoint("historico/")?;
        tracing::debug!(%url, "fetching search history");

        let request = self.client.client().get(url);
        self.fetch(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "history request failed");
        })
    }

    async fn get(&self, id: i64) -> Result<SearchResult, ApiError> {
        let url = self.endpoint(&format!("pesquisas/{}/", id))?;
        tracing::debug!(%url, id, "fetching search result");

        let request = self.client.client().get(url);
        self.fetch(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, id, "result request failed");
        })
    }
}
