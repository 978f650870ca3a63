//! Access-type badges and link actions for result cards.
//!
//! Both are derived from free text sent by the service, so matching is
//! case-insensitive substring search. Badge categories are tested in a
//! fixed order and the first match wins: a label such as `"PDF Article"`
//! is a [`BadgeKind::Pdf`]. Blank or whitespace-only values count as
//! absent.
//!
//! Web text is recognized by `blog` and `texto` only; a bare `text` would
//! also catch labels like "Open access full text", which stay documents.

use serde::Serialize;

/// Category of an access-type badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// No access hint was given
    Unspecified,
    Pdf,
    Article,
    /// Blog posts and plain web text
    WebText,
    /// Tutorials and guides
    Tutorial,
    /// Anything else
    Document,
}

/// Keywords per category, in match order
const BADGE_KEYWORDS: &[(BadgeKind, &[&str])] = &[
    (BadgeKind::Pdf, &["pdf"]),
    (BadgeKind::Article, &["artigo", "article"]),
    (BadgeKind::WebText, &["blog", "texto"]),
    (BadgeKind::Tutorial, &["tutorial", "guia", "guide"]),
];

impl BadgeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            BadgeKind::Unspecified => "📄",
            BadgeKind::Pdf => "📕",
            BadgeKind::Article => "📗",
            BadgeKind::WebText => "🌐",
            BadgeKind::Tutorial => "ℹ",
            BadgeKind::Document => "📘",
        }
    }
}

/// A classified access-type label ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessBadge {
    pub kind: BadgeKind,
    pub label: String,
}

impl AccessBadge {
    /// Classify an access-type hint
    pub fn classify(access_type: Option<&str>) -> Self {
        let Some(text) = non_blank(access_type) else {
            return Self {
                kind: BadgeKind::Unspecified,
                label: "Not specified".to_string(),
            };
        };

        let lower = text.to_lowercase();
        let kind = BADGE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(kind, _)| *kind)
            .unwrap_or(BadgeKind::Document);

        let label = match kind {
            BadgeKind::Pdf => "PDF available".to_string(),
            BadgeKind::Article => "Article".to_string(),
            _ => text.to_string(),
        };

        Self { kind, label }
    }
}

/// What the call-to-action of a source card does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAction {
    /// The link most likely points straight at a PDF file
    Download,
    /// Any other link
    Open,
}

impl LinkAction {
    /// Pick the action for a source link; `None` when there is no link
    pub fn for_link(link: Option<&str>) -> Option<Self> {
        let link = non_blank(link)?;
        Some(if is_pdf_link(link) {
            LinkAction::Download
        } else {
            LinkAction::Open
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkAction::Download => "Download PDF",
            LinkAction::Open => "Access source",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            LinkAction::Download => "↓",
            LinkAction::Open => "↗",
        }
    }
}

/// `None` for missing, empty or whitespace-only text
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Heuristic check for a direct PDF link
pub fn is_pdf_link(link: &str) -> bool {
    let lower = link.to_lowercase();
    lower.ends_with(".pdf")
        || lower.contains("/pdf/")
        || lower.contains("pdf=")
        || lower.contains("type=pdf")
}
