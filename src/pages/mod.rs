//! Page containers wiring views together.
//!
//! A page owns the "currently displayed result" in a [`ResultSlot`] and
//! hands the slot's setter to its views as their callback. Views persist
//! for the lifetime of the page; only the slot value changes.

mod history;
mod home;

pub use history::{HistoryPage, HistoryPageRender, SELECT_PROMPT};
pub use home::{HomePage, HomeRender};

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::SearchResult;
use crate::views::Callback;

/// Nullable result owned by a page
#[derive(Debug, Clone, Default)]
pub struct ResultSlot(Arc<Mutex<Option<SearchResult>>>);

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<SearchResult> {
        self.lock().clone()
    }

    pub fn set(&self, result: SearchResult) {
        *self.lock() = Some(result);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// A callback that stores whatever it is given
    pub fn setter(&self) -> Callback<SearchResult> {
        let slot = self.clone();
        Arc::new(move |result| slot.set(result))
    }

    fn lock(&self) -> MutexGuard<'_, Option<SearchResult>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
