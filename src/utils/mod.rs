//! Utility modules supporting the client.
//!
//! - [`HttpClient`]: shared reqwest client with JSON defaults
//! - [`truncate_with_ellipsis`]: unicode-aware truncation for table cells
//! - [`format_local_timestamp`]: render service timestamps in local time

mod display;
mod http;

pub use display::{
    format_local_timestamp, history_table_columns, is_terminal, terminal_width,
    truncate_with_ellipsis, DEFAULT_WIDTH,
};
pub use http::HttpClient;
