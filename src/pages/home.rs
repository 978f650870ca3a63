//! Home page: search form plus the latest result.

use std::sync::Arc;

use super::ResultSlot;
use crate::api::SearchApi;
use crate::models::SearchResult;
use crate::views::{FormState, ResultRender, SearchForm, SubmitOutcome};

/// Snapshot of the home page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRender {
    pub form: FormState,
    /// `None` until a search succeeds
    pub result: Option<ResultRender>,
}

/// Search form wired to the current result
#[derive(Debug)]
pub struct HomePage {
    form: SearchForm,
    current: ResultSlot,
}

impl HomePage {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        let current = ResultSlot::new();
        let form = SearchForm::new(api, current.setter());
        Self { form, current }
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    /// Submit a term through the page's form
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        self.form.submit(raw).await
    }

    pub fn current(&self) -> Option<SearchResult> {
        self.current.get()
    }

    pub fn render(&self) -> HomeRender {
        HomeRender {
            form: self.form.state(),
            result: self.current.get().as_ref().map(ResultRender::from_result),
        }
    }

    pub fn unmount(&self) {
        self.form.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_result;
    use crate::api::{ApiError, MockSearchApi};

    #[tokio::test]
    async fn test_initially_empty() {
        let page = HomePage::new(Arc::new(MockSearchApi::new()));
        let render = page.render();
        assert_eq!(render.result, None);
        assert_eq!(render.form, FormState::default());
    }

    #[tokio::test]
    async fn test_success_replaces_current_result() {
        let api = Arc::new(MockSearchApi::new());
        let page = HomePage::new(api.clone());

        api.set_search_response(Ok(make_result(1, "first term", &["A"])));
        page.submit("first term").await;
        assert_eq!(page.current().map(|r| r.id), Some(1));

        api.set_search_response(Ok(make_result(2, "second term", &["B", "C"])));
        page.submit("second term").await;

        let render = page.render();
        let Some(ResultRender::Sources { term, cards, .. }) = render.result else {
            panic!("expected sources");
        };
        assert_eq!(term, "second term");
        assert_eq!(cards.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let api = Arc::new(MockSearchApi::new());
        let page = HomePage::new(api.clone());

        api.set_search_response(Ok(make_result(1, "kept", &[])));
        page.submit("kept").await;

        api.set_search_response(Err(ApiError::Network("offline".into())));
        page.submit("lost").await;

        let render = page.render();
        assert!(render.form.error.is_some());
        assert!(matches!(render.result, Some(ResultRender::Empty { .. })));
    }
}
