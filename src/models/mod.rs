//! Core data models exchanged with the search service.

mod search;
mod source;

pub use search::{SearchInput, SearchResult, SearchTermError, MIN_TERM_LENGTH};
pub use source::{Source, SourceBuilder};
