//! Terminal display utilities for CLI output formatting.
//!
//! Width handling is unicode-aware so accented and wide characters in
//! titles and author lists do not break table alignment.

use chrono::{DateTime, Local, NaiveDateTime};
use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| Terminal {
        width: terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH),
        is_tty: io::stdout().is_terminal(),
    })
}

/// Get the current terminal width in characters.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

/// Truncate text to fit within `max_width` display columns, appending an
/// ellipsis when anything was cut.
///
/// # Examples
///
/// ```
/// use academic_search::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width.saturating_sub(3) {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    if end_idx == 0 {
        return "...".to_string();
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated.trim_end())
}

/// Format an ISO-8601 timestamp in the local time zone as
/// `dd/mm/yyyy HH:MM`.
///
/// A timestamp without an offset is taken to be local time already.
/// Unparseable input is returned unchanged.
pub fn format_local_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%d/%m/%Y %H:%M";

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format(DISPLAY).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format(DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Column widths for the history table: (term, date, count)
pub fn history_table_columns(terminal_width: usize) -> (usize, usize, usize) {
    const DATE: usize = 16;
    const COUNT: usize = 7;
    // borders and padding of a 4-column UTF8 table
    const CHROME: usize = 16;

    let term = terminal_width
        .saturating_sub(DATE + COUNT + 4 + CHROME)
        .clamp(20, 80);
    (term, DATE, COUNT)
}
