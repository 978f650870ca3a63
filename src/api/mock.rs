//! Mock search service for testing purposes.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{ApiError, SearchApi};
use crate::models::{SearchInput, SearchResult, Source};

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Search(String),
    History,
    Get(i64),
}

/// A mock service that returns predefined responses and records every call.
///
/// Unconfigured operations answer with a 500 status error. When a gate is
/// installed each call waits for [`MockSearchApi::release`] before answering.
#[derive(Debug, Default)]
pub struct MockSearchApi {
    search_response: Mutex<Option<Result<SearchResult, ApiError>>>,
    history_response: Mutex<Option<Result<Vec<SearchResult>, ApiError>>>,
    get_response: Mutex<Option<Result<SearchResult, ApiError>>>,
    calls: Mutex<Vec<ApiCall>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockSearchApi {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search response to return.
    pub fn set_search_response(&self, response: Result<SearchResult, ApiError>) {
        *lock(&self.search_response) = Some(response);
    }

    /// Set the history response to return.
    pub fn set_history_response(&self, response: Result<Vec<SearchResult>, ApiError>) {
        *lock(&self.history_response) = Some(response);
    }

    /// Set the single-result response to return.
    pub fn set_get_response(&self, response: Result<SearchResult, ApiError>) {
        *lock(&self.get_response) = Some(response);
    }

    /// Hold every subsequent call until [`release`](Self::release) is called.
    pub fn hold_responses(&self) {
        *lock(&self.gate) = Some(Arc::new(Notify::new()));
    }

    /// Let one held call proceed.
    pub fn release(&self) {
        if let Some(gate) = lock(&self.gate).as_ref() {
            gate.notify_one();
        }
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    async fn answer<T: Clone>(
        &self,
        call: ApiCall,
        slot: &Mutex<Option<Result<T, ApiError>>>,
    ) -> Result<T, ApiError> {
        lock(&self.calls).push(call);

        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        lock(slot).clone().unwrap_or_else(|| {
            Err(ApiError::Status {
                status: 500,
                body: None,
            })
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl SearchApi for MockSearchApi {
    async fn search(&self, input: &SearchInput) -> Result<SearchResult, ApiError> {
        self.answer(ApiCall::Search(input.term.clone()), &self.search_response)
            .await
    }

    async fn history(&self) -> Result<Vec<SearchResult>, ApiError> {
        self.answer(ApiCall::History, &self.history_response).await
    }

    async fn get(&self, id: i64) -> Result<SearchResult, ApiError> {
        self.answer(ApiCall::Get(id), &self.get_response).await
    }
}

/// Helper function to create a search result for testing.
pub fn make_result(id: i64, term: &str, titles: &[&str]) -> SearchResult {
    let sources = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Source::new(id * 100 + i as i64, *title))
        .collect();

    SearchResult::new(id, term, "2024-05-10T09:15:00Z").with_sources(sources)
}
