//! History list view.

use std::sync::Arc;

use super::state::{Load, ViewState};
use super::Callback;
use crate::api::SearchApi;
use crate::models::SearchResult;
use crate::utils::format_local_timestamp;

/// Shown when the history could not be fetched
pub const HISTORY_FAILED_MESSAGE: &str =
    "Could not load the search history. Please try again later.";

/// One history row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Position in the list, zero-based
    pub index: usize,
    pub term: String,
    /// Search time in the local time zone
    pub searched_at: String,
    pub source_count: usize,
}

/// What the history view shows; exactly one variant at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRender {
    Loading,
    /// Fetch failed; a retry is available
    Error(String),
    /// No searches have been run yet
    Empty,
    Entries(Vec<HistoryRow>),
}

/// Lists previous searches and hands the chosen one to its parent.
pub struct HistoryView {
    api: Arc<dyn SearchApi>,
    on_select: Callback<SearchResult>,
    state: ViewState<Vec<SearchResult>>,
}

impl std::fmt::Debug for HistoryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryView")
            .field("api", &self.api)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl HistoryView {
    pub fn new(api: Arc<dyn SearchApi>, on_select: Callback<SearchResult>) -> Self {
        Self {
            api,
            on_select,
            state: ViewState::new(Load::Idle),
        }
    }

    /// Fetch the history list
    pub async fn mount(&self) {
        self.load().await;
    }

    /// Fetch the history again after a failure
    pub async fn retry(&self) {
        tracing::debug!("retrying history fetch");
        self.load().await;
    }

    async fn load(&self) {
        if !self.state.liveness().is_mounted() {
            return;
        }

        self.state.set(Load::Loading);
        let load = match self.api.history().await {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "history loaded");
                Load::Ready(entries)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load search history");
                Load::Failed(HISTORY_FAILED_MESSAGE.to_string())
            }
        };
        self.state.settle(load);
    }

    /// Loaded entries, in service order
    pub fn entries(&self) -> Option<Vec<SearchResult>> {
        self.state.with(|load| load.ready().cloned())
    }

    pub fn render(&self) -> HistoryRender {
        self.state.with(|load| match load {
            Load::Idle | Load::Loading => HistoryRender::Loading,
            Load::Failed(message) => HistoryRender::Error(message.clone()),
            Load::Ready(entries) if entries.is_empty() => HistoryRender::Empty,
            Load::Ready(entries) => HistoryRender::Entries(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| HistoryRow {
                        index,
                        term: entry.term.clone(),
                        searched_at: format_local_timestamp(&entry.searched_at),
                        source_count: entry.source_count(),
                    })
                    .collect(),
            ),
        })
    }

    /// Pass entry `index` to the selection callback.
    ///
    /// The entry is already loaded, so no request is made. Returns false
    /// when the list is not loaded or the index is out of range.
    pub fn select(&self, index: usize) -> bool {
        let Some(entry) = self.state.with(|load| load.ready().and_then(|e| e.get(index)).cloned())
        else {
            return false;
        };

        tracing::debug!(index, id = entry.id, "history entry selected");
        (self.on_select)(entry);
        true
    }

    pub fn unmount(&self) {
        self.state.liveness().unmount();
    }
}
