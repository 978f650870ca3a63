//! Load state shared by the asynchronous views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle of one asynchronous operation
///
/// `Idle | Loading -> Ready | Failed`. A failed load is recovered by
/// running the same operation again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Load<T> {
    /// True before the operation settled, including before it started
    pub fn is_pending(&self) -> bool {
        matches!(self, Load::Idle | Load::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Whether a view is still mounted.
///
/// Clones share the flag. Once cleared, responses that settle afterwards
/// are dropped instead of being written into the view.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// A view's load state plus its liveness flag
#[derive(Debug)]
pub(crate) struct ViewState<T> {
    load: Mutex<Load<T>>,
    liveness: Liveness,
}

impl<T: Clone> ViewState<T> {
    pub(crate) fn new(initial: Load<T>) -> Self {
        Self {
            load: Mutex::new(initial),
            liveness: Liveness::new(),
        }
    }

    pub(crate) fn snapshot(&self) -> Load<T> {
        self.lock().clone()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&Load<T>) -> R) -> R {
        f(&self.lock())
    }

    pub(crate) fn set(&self, load: Load<T>) {
        *self.lock() = load;
    }

    /// Store a settled outcome; returns false when the view was unmounted
    /// while the request was in flight.
    pub(crate) fn settle(&self, load: Load<T>) -> bool {
        if !self.liveness.is_mounted() {
            tracing::debug!("discarding response for unmounted view");
            return false;
        }
        self.set(load);
        true
    }

    pub(crate) fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn lock(&self) -> MutexGuard<'_, Load<T>> {
        self.load.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
