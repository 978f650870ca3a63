//! Terminal rendering of the view-models.
//!
//! Every render state has exactly one textual form. Styled output uses
//! colors and box drawing; plain output is the same content without
//! either, so it can be piped or diffed.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::classify::{non_blank, BadgeKind, LinkAction};
use crate::config::OutputFormat;
use crate::pages::{HistoryPageRender, HomeRender, SELECT_PROMPT};
use crate::utils::{
    format_local_timestamp, history_table_columns, is_terminal, terminal_width,
    truncate_with_ellipsis,
};
use crate::views::{FormState, HistoryRender, ResultRender, SourceCard};

/// Shown when a search found no sources
pub const NO_RESULTS_MESSAGE: &str = "No academic sources were found for this search.";

/// Shown when the history list is empty
pub const NO_HISTORY_MESSAGE: &str = "No searches have been run yet.";

/// Shown while something loads
pub const LOADING_MESSAGE: &str = "Loading...";

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Loading,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Loading => "◐",
        Status::Search => "🔍",
    }
}

/// Resolve `Auto` against the terminal
pub fn resolve_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto if is_terminal() => OutputFormat::Table,
        OutputFormat::Auto => OutputFormat::Json,
        other => other,
    }
}

/// A status line, styled unless `plain`
pub fn status_line(status: Status, msg: &str, plain: bool) -> String {
    let icon = status_icon(status);
    if plain {
        return format!("{} {}", icon, msg);
    }
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg.red()),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Loading => format!("{} {}", icon.cyan(), msg.dimmed()),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str, plain: bool) {
    println!();
    if plain {
        println!("== {} ==", title);
    } else {
        println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
    }
}

/// Badge text such as `[📕 PDF available]`
pub fn badge_text(card: &SourceCard, plain: bool) -> String {
    let text = format!("[{} {}]", card.badge.kind.icon(), card.badge.label);
    if plain {
        return text;
    }
    match card.badge.kind {
        BadgeKind::Pdf => text.red().to_string(),
        BadgeKind::Article => text.green().to_string(),
        BadgeKind::WebText | BadgeKind::Document => text.blue().to_string(),
        BadgeKind::Tutorial => text.yellow().to_string(),
        BadgeKind::Unspecified => text.dimmed().to_string(),
    }
}

/// Format one source card as display lines
pub fn format_source_card(position: usize, card: &SourceCard, plain: bool) -> Vec<String> {
    let width = terminal_width().max(40);
    let source = &card.source;
    let mut lines = Vec::new();

    let title = truncate_with_ellipsis(&source.title, width.saturating_sub(6));
    if plain {
        lines.push(format!("{:>2}. {}", position, title));
    } else {
        lines.push(format!("{:>2}. {}", position, title.blue().bold()));
    }

    if let Some(authors) = non_blank(source.authors.as_deref()) {
        lines.push(format!(
            "    Authors: {}",
            truncate_with_ellipsis(authors, width.saturating_sub(14))
        ));
    }

    let origin: Vec<String> = non_blank(source.institution.as_deref())
        .map(str::to_string)
        .into_iter()
        .chain(source.year.map(|y| y.to_string()))
        .collect();
    if !origin.is_empty() {
        lines.push(format!("    {}", origin.join(" · ")));
    }

    lines.push(format!("    {}", badge_text(card, plain)));

    if let Some(description) = non_blank(source.description.as_deref()) {
        lines.push(format!(
            "    {}",
            truncate_with_ellipsis(description, width.saturating_sub(8))
        ));
    }

    if let (Some(action), Some(link)) = (card.action, non_blank(source.link.as_deref())) {
        let label = format!("{} {}", action.icon(), action.label());
        if plain {
            lines.push(format!("    {}: {}", label, link));
        } else {
            let label = match action {
                LinkAction::Download => label.red().bold().to_string(),
                LinkAction::Open => label.cyan().bold().to_string(),
            };
            lines.push(format!("    {}: {}", label, link.underline()));
        }
    }

    lines
}

/// Print a result view
pub fn print_result(render: &ResultRender, plain: bool) {
    match render {
        ResultRender::Loading => println!("{}", status_line(Status::Loading, LOADING_MESSAGE, plain)),
        ResultRender::Error(message) => {
            println!("{}", status_line(Status::Error, message, plain))
        }
        ResultRender::Empty { term, searched_at } => {
            print_result_header(term, searched_at, 0, plain);
            println!("{}", status_line(Status::Info, NO_RESULTS_MESSAGE, plain));
        }
        ResultRender::Sources {
            term,
            searched_at,
            cards,
        } => {
            print_result_header(term, searched_at, cards.len(), plain);
            for (i, card) in cards.iter().enumerate() {
                for line in format_source_card(i + 1, card, plain) {
                    println!("{}", line);
                }
                println!();
            }
        }
    }
}

fn print_result_header(term: &str, searched_at: &str, count: usize, plain: bool) {
    print_section(&format!("Results for \"{}\"", term), plain);
    let summary = format!(
        "{} source{} · searched {}",
        count,
        if count == 1 { "" } else { "s" },
        format_local_timestamp(searched_at)
    );
    if plain {
        println!("{}", summary);
    } else {
        println!("{}", summary.dimmed());
    }
    println!();
}

/// Build the history table
pub fn history_table(render: &HistoryRender, plain: bool) -> Option<Table> {
    let HistoryRender::Entries(rows) = render else {
        return None;
    };

    let (term_width, _, _) = history_table_columns(terminal_width());
    let mut table = Table::new();
    table.load_preset(if plain {
        presets::ASCII_MARKDOWN
    } else {
        presets::UTF8_FULL
    });
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Term", "Searched", "Sources"]);

    for row in rows {
        let term = truncate_with_ellipsis(&row.term, term_width);
        let term_cell = if plain {
            Cell::new(term)
        } else {
            Cell::new(term).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(row.index + 1).set_alignment(CellAlignment::Right),
            term_cell,
            Cell::new(&row.searched_at),
            Cell::new(row.source_count).set_alignment(CellAlignment::Right),
        ]);
    }

    Some(table)
}

/// Print a history view
pub fn print_history(render: &HistoryRender, plain: bool) {
    print_section("Search history", plain);
    match render {
        HistoryRender::Loading => println!("{}", status_line(Status::Loading, LOADING_MESSAGE, plain)),
        HistoryRender::Error(message) => {
            println!("{}", status_line(Status::Error, message, plain));
            println!("{}", status_line(Status::Info, "Retry with /retry or run the command again.", plain));
        }
        HistoryRender::Empty => println!("{}", status_line(Status::Info, NO_HISTORY_MESSAGE, plain)),
        HistoryRender::Entries(_) => {
            if let Some(table) = history_table(render, plain) {
                println!("{table}");
            }
        }
    }
}

/// Print the search form's error, if any
pub fn print_form(state: &FormState, plain: bool) {
    if let Some(error) = &state.error {
        eprintln!("{}", status_line(Status::Error, error, plain));
    }
}

/// Print the home page
pub fn print_home(render: &HomeRender, plain: bool) {
    print_form(&render.form, plain);
    if let Some(result) = &render.result {
        print_result(result, plain);
    }
}

/// Print the history page
pub fn print_history_page(render: &HistoryPageRender, plain: bool) {
    print_history(&render.history, plain);
    match &render.result {
        Some(result) => print_result(result, plain),
        None if matches!(render.history, HistoryRender::Entries(_)) => {
            println!("{}", status_line(Status::Info, SELECT_PROMPT, plain));
        }
        None => {}
    }
}

/// Loading spinner shown while a request is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
