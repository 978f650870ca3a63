//! Search input and result models.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Source;

/// Minimum number of characters a trimmed search term must have
pub const MIN_TERM_LENGTH: usize = 3;

/// One completed search: term, timestamp and the sources found for it
///
/// Sources are kept in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Server-assigned identifier
    pub id: i64,

    /// The submitted search term
    #[serde(rename = "termo")]
    pub term: String,

    /// When the search ran (ISO-8601, as sent by the service)
    #[serde(rename = "data_pesquisa")]
    pub searched_at: String,

    /// Sources found for the term
    #[serde(rename = "fontes", default)]
    pub sources: Vec<Source>,
}

impl SearchResult {
    pub fn new(id: i64, term: impl Into<String>, searched_at: impl Into<String>) -> Self {
        Self {
            id,
            term: term.into(),
            searched_at: searched_at.into(),
            sources: Vec::new(),
        }
    }

    /// Attach sources, replacing any present
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Parse the search timestamp, if it is valid RFC 3339
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.searched_at).ok()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Rejected search term
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchTermError {
    #[error("Search term must be at least {min} characters.")]
    TooShort { min: usize, actual: usize },
}

/// The outbound search payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInput {
    #[serde(rename = "termo")]
    pub term: String,
}

impl SearchInput {
    /// Trim and validate a raw term
    ///
    /// Length is counted in characters, so accented terms are not
    /// penalized for their UTF-8 width.
    pub fn new(raw: &str) -> Result<Self, SearchTermError> {
        let term = raw.trim();
        let actual = term.chars().count();
        if actual < MIN_TERM_LENGTH {
            return Err(SearchTermError::TooShort {
                min: MIN_TERM_LENGTH,
                actual,
            });
        }

        Ok(Self {
            term: term.to_string(),
        })
    }
}
