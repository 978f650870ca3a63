//! View-models for the client's three screens.
//!
//! Each view wraps one service call. Views never share state: results
//! flow to the parent through callbacks, and the parent decides what to
//! display next.
//!
//! - [`SearchForm`]: validates a term and submits it
//! - [`ResultView`]: shows one result, handed in or fetched by id
//! - [`HistoryView`]: lists previous searches and reports a selection
//!
//! Asynchronous views track whether they are still mounted; a response
//! that arrives after [`unmount`](HistoryView::unmount) is dropped.

mod history_view;
mod result_view;
mod search_form;
mod state;

pub use history_view::{HistoryRender, HistoryRow, HistoryView, HISTORY_FAILED_MESSAGE};
pub use result_view::{
    ResultRender, ResultSource, ResultView, SourceCard, RESULT_FAILED_MESSAGE,
};
pub use search_form::{FormState, SearchForm, SubmitOutcome, SEARCH_FAILED_MESSAGE};
pub use state::{Liveness, Load};

use std::sync::Arc;

/// Parent-supplied handler a view calls with its output
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;
