//! # Academic Search
//!
//! Client for an academic search service: submit a search term, display
//! the sources the service found, and browse previously run searches.
//!
//! ## Architecture
//!
//! - [`models`]: wire-compatible data structures (`SearchResult`, `Source`, `SearchInput`)
//! - [`api`]: the [`SearchApi`] trait, its HTTP implementation and a mock
//! - [`views`]: view-models for the search form, result display and history list
//! - [`pages`]: containers that own the displayed result and wire views together
//! - [`classify`]: access-type badges and download/open link actions
//! - [`ui`]: terminal rendering of every view state
//! - [`config`]: layered configuration (defaults, TOML file, environment)
//! - [`utils`]: HTTP client and display helpers

pub mod api;
pub mod classify;
pub mod config;
pub mod models;
pub mod pages;
pub mod ui;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use api::{ApiError, HttpSearchApi, SearchApi};
pub use models::{SearchInput, SearchResult, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
