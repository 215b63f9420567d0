use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;

static SPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Plain-text article body ready for retyping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArticle {
    /// Best-effort title; empty when the page has none.
    pub title: String,
    pub text: String,
    /// Character count of the full body, before any truncation.
    pub text_length: usize,
    /// Hostname of the requested URL.
    #[serde(rename = "source")]
    pub source_host: String,
    /// The requested URL, echoed back unchanged.
    pub url: String,
    pub truncated: bool,
}

/// Per-request extraction knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Cut `text` to this many characters. `None` returns the whole body.
    pub max_chars: Option<usize>,
}

impl ExtractOptions {
    pub fn full() -> Self {
        Self { max_chars: None }
    }

    pub fn truncated(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
        }
    }
}

#[derive(Debug)]
pub struct ReadabilityResult {
    pub title: String,
    pub text: String,
}

pub fn normalize_whitespace(text: &str) -> String {
    let text = text.trim();

    // Replace multiple spaces/tabs with single space
    let spaced = SPACE_REGEX.replace_all(text, " ");

    // Convert multiple consecutive newlines to double newlines
    NEWLINE_REGEX.replace_all(&spaced, "\n\n").to_string()
}

/// First `max_chars` characters of `text`, and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (text[..byte_idx].trim_end().to_string(), true),
        None => (text.to_string(), false),
    }
}
