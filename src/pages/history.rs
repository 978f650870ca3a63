//! History page: past searches plus the selected one.

use std::sync::Arc;

use super::ResultSlot;
use crate::api::SearchApi;
use crate::models::SearchResult;
use crate::views::{HistoryRender, HistoryView, ResultRender};

/// Shown in place of a result until an entry is selected
pub const SELECT_PROMPT: &str = "Select a search from the history to view its results";

/// Snapshot of the history page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPageRender {
    pub history: HistoryRender,
    /// `None` until an entry is selected
    pub result: Option<ResultRender>,
}

/// History list wired to the selected result
#[derive(Debug)]
pub struct HistoryPage {
    history: HistoryView,
    selected: ResultSlot,
}

impl HistoryPage {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        let selected = ResultSlot::new();
        let history = HistoryView::new(api, selected.setter());
        Self { history, selected }
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub async fn mount(&self) {
        self.history.mount().await;
    }

    pub async fn retry(&self) {
        self.history.retry().await;
    }

    /// Select entry `index`; false if there is no such entry
    pub fn select(&self, index: usize) -> bool {
        self.history.select(index)
    }

    pub fn selected(&self) -> Option<SearchResult> {
        self.selected.get()
    }

    pub fn render(&self) -> HistoryPageRender {
        HistoryPageRender {
            history: self.history.render(),
            result: self.selected.get().as_ref().map(ResultRender::from_result),
        }
    }

    pub fn unmount(&self) {
        self.history.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_result;
    use crate::api::MockSearchApi;

    #[tokio::test]
    async fn test_selection_flows_to_result() {
        let api = Arc::new(MockSearchApi::new());
        let history = vec![
            make_result(7, "seven", &["s1"]),
            make_result(8, "eight", &["e1", "e2"]),
        ];
        api.set_history_response(Ok(history.clone()));
        let page = HistoryPage::new(api.clone());

        page.mount().await;
        assert_eq!(page.render().result, None);

        assert!(page.select(0));
        assert_eq!(page.selected(), Some(history[0].clone()));

        assert!(page.select(1));
        assert_eq!(page.selected(), Some(history[1].clone()));
        assert_eq!(
            page.render().result,
            Some(ResultRender::from_result(&history[1]))
        );

        // only the initial history fetch reached the service
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_history_leaves_no_selection() {
        let api = Arc::new(MockSearchApi::new());
        let page = HistoryPage::new(api);

        page.mount().await;

        let render = page.render();
        assert!(matches!(render.history, HistoryRender::Error(_)));
        assert!(!page.select(0));
        assert_eq!(render.result, None);
    }
}
