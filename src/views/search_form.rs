//! Search submission view.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Callback, Liveness};
use crate::api::{ApiError, SearchApi};
use crate::models::{SearchInput, SearchResult, SearchTermError};

/// Shown when a failed search carries no field-level message
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

/// Field whose first validation message is surfaced to the user
const TERM_FIELD: &str = "termo";

/// What the form currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Raw text of the last submission
    pub input: String,
    /// A request is in flight; input is disabled
    pub submitting: bool,
    /// Validation or request failure message
    pub error: Option<String>,
}

/// How a submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Rejected locally, no request was sent
    Rejected(SearchTermError),
    /// The success callback received the result
    Completed,
    /// The request failed; the form shows the error
    Failed(ApiError),
    /// The form was unmounted before the response arrived
    Discarded,
    /// A search was already in flight; nothing was sent
    Busy,
}

/// Collects a term, validates it and runs the search.
///
/// On success the parsed result goes to the caller-supplied callback; the
/// form itself keeps only its input, busy flag and error message.
pub struct SearchForm {
    api: Arc<dyn SearchApi>,
    on_success: Callback<SearchResult>,
    state: Mutex<FormState>,
    liveness: Liveness,
}

impl std::fmt::Debug for SearchForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchForm")
            .field("api", &self.api)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Clears the busy flag when dropped
struct Submitting<'a>(&'a Mutex<FormState>);

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        lock(self.0).submitting = false;
    }
}

impl SearchForm {
    pub fn new(api: Arc<dyn SearchApi>, on_success: Callback<SearchResult>) -> Self {
        Self {
            api,
            on_success,
            state: Mutex::new(FormState::default()),
            liveness: Liveness::new(),
        }
    }

    /// Current form state
    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.state).submitting
    }

    /// Submit a raw term.
    ///
    /// Terms shorter than three characters after trimming are rejected
    /// without touching the network. Input is disabled while a search is
    /// in flight: a second call returns [`SubmitOutcome::Busy`] and leaves
    /// the form untouched. The busy flag is always cleared before the
    /// in-flight call returns.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        if self.is_submitting() {
            tracing::debug!("search already in flight, ignoring submit");
            return SubmitOutcome::Busy;
        }

        let input = match SearchInput::new(raw) {
            Ok(input) => input,
            Err(e) => {
                let mut state = lock(&self.state);
                state.input = raw.to_string();
                state.error = Some(e.to_string());
                return SubmitOutcome::Rejected(e);
            }
        };

        {
            let mut state = lock(&self.state);
            if state.submitting {
                return SubmitOutcome::Busy;
            }
            state.input = raw.to_string();
            state.error = None;
            state.submitting = true;
        }
        let _busy = Submitting(&self.state);

        tracing::info!(term = %input.term, "running search");
        let outcome = self.api.search(&input).await;

        if !self.liveness.is_mounted() {
            tracing::debug!(term = %input.term, "search settled after unmount");
            return SubmitOutcome::Discarded;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(id = result.id, sources = result.source_count(), "search completed");
                (self.on_success)(result);
                SubmitOutcome::Completed
            }
            Err(e) => {
                let message = e
                    .field_message(TERM_FIELD)
                    .map(str::to_owned)
                    .unwrap_or_else(|| SEARCH_FAILED_MESSAGE.to_string());
                lock(&self.state).error = Some(message);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Stop applying responses to this form
    pub fn unmount(&self) {
        self.liveness.unmount();
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_result;
    use crate::api::{ApiCall, MockSearchApi};
    use serde_json::json;
    use tokio_test::{assert_pending, assert_ready, task};

    fn form_with(api: Arc<MockSearchApi>) -> (SearchForm, Arc<Mutex<Vec<SearchResult>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let form = SearchForm::new(
            api,
            Arc::new(move |result: SearchResult| sink.lock().unwrap().push(result)),
        );
        (form, received)
    }

    #[tokio::test]
    async fn test_short_term_rejected_without_request() {
        let api = Arc::new(MockSearchApi::new());
        let (form, received) = form_with(api.clone());

        for raw in ["AI", "  ab  ", ""] {
            let outcome = form.submit(raw).await;
            assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
            let state = form.state();
            assert_eq!(
                state.error.as_deref(),
                Some("Search term must be at least 3 characters.")
            );
            assert!(!state.submitting);
        }

        assert_eq!(api.call_count(), 0);
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_passes_result_to_callback() {
        let api = Arc::new(MockSearchApi::new());
        let expected = make_result(1, "quantum computing", &["Paper A", "Paper B"]);
        api.set_search_response(Ok(expected.clone()));
        let (form, received) = form_with(api.clone());

        let outcome = form.submit("  quantum computing  ").await;

        assert!(matches!(outcome, SubmitOutcome::Completed));
        assert_eq!(api.calls(), vec![ApiCall::Search("quantum computing".into())]);
        assert_eq!(*received.lock().unwrap(), vec![expected]);
        let state = form.state();
        assert!(!state.submitting);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_failure_uses_field_message() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Err(ApiError::Status {
            status: 400,
            body: Some(json!({"termo": ["Term is not allowed."]})),
        }));
        let (form, received) = form_with(api);

        let outcome = form.submit("forbidden").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(form.state().error.as_deref(), Some("Term is not allowed."));
        assert!(!form.is_submitting());
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_generic_message() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Err(ApiError::Network("connection refused".into())));
        let (form, received) = form_with(api);

        form.submit("quantum").await;

        assert_eq!(form.state().error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert!(!form.is_submitting());
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_error() {
        let api = Arc::new(MockSearchApi::new());
        let (form, _received) = form_with(api.clone());

        form.submit("AI").await;
        assert!(form.state().error.is_some());

        api.set_search_response(Ok(make_result(2, "graphs", &[])));
        form.submit("graphs").await;
        assert_eq!(form.state().error, None);
    }

    #[tokio::test]
    async fn test_busy_while_in_flight() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Ok(make_result(3, "topology", &["T"])));
        api.hold_responses();
        let (form, received) = form_with(api.clone());
        let form = Arc::new(form);

        let task = tokio::spawn({
            let form = form.clone();
            async move { form.submit("topology").await }
        });

        while api.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(form.is_submitting());

        api.release();
        let outcome = task.await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed));
        assert!(!form.is_submitting());
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Ok(make_result(5, "first term", &["F"])));
        api.hold_responses();
        let (form, received) = form_with(api.clone());
        let form = Arc::new(form);

        let first = tokio::spawn({
            let form = form.clone();
            async move { form.submit("first term").await }
        });
        while api.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        let second = form.submit("second term").await;
        assert!(matches!(second, SubmitOutcome::Busy));
        assert!(form.is_submitting());
        assert_eq!(form.state().input, "first term");

        api.release();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Completed));

        assert_eq!(api.calls(), vec![ApiCall::Search("first term".into())]);
        assert!(!form.is_submitting());
        assert_eq!(received.lock().unwrap().len(), 1);
        assert_eq!(received.lock().unwrap()[0].term, "first term");
    }

    #[test]
    fn test_rejection_resolves_on_first_poll() {
        let api = Arc::new(MockSearchApi::new());
        let (form, _received) = form_with(api.clone());

        let mut submit = task::spawn(form.submit("AI"));
        let outcome = assert_ready!(submit.poll());

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_held_search_keeps_form_disabled() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Ok(make_result(6, "topology", &["T"])));
        api.hold_responses();
        let (form, _received) = form_with(api.clone());

        let mut submit = task::spawn(form.submit("topology"));
        assert_pending!(submit.poll());
        assert!(form.is_submitting());

        let mut again = task::spawn(form.submit("algebra"));
        assert!(matches!(assert_ready!(again.poll()), SubmitOutcome::Busy));

        api.release();
        assert!(submit.is_woken());
        assert!(matches!(assert_ready!(submit.poll()), SubmitOutcome::Completed));
        assert!(!form.is_submitting());
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_late_response_after_unmount_is_discarded() {
        let api = Arc::new(MockSearchApi::new());
        api.set_search_response(Ok(make_result(4, "late", &["X"])));
        api.hold_responses();
        let (form, received) = form_with(api.clone());
        let form = Arc::new(form);

        let task = tokio::spawn({
            let form = form.clone();
            async move { form.submit("late arrival").await }
        });
        while api.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        form.unmount();
        api.release();

        assert!(matches!(task.await.unwrap(), SubmitOutcome::Discarded));
        assert!(received.lock().unwrap().is_empty());
    }
}
