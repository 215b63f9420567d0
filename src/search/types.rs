use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::search::errors::BackendError;
use crate::search::normalize::{display_host, normalize_link};

/// Which search backend produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Google,
    Naver,
}

impl SourceType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Naver => "naver",
        }
    }

    pub fn all() -> &'static [SourceType] {
        &[Self::Google, Self::Naver]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|source| source.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One normalized hit from a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub source_type: SourceType,
    pub title: String,
    pub snippet: String,
    /// Absolute URL with trailing slashes removed; the deduplication key.
    pub link: String,
    pub display_host: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl SearchResult {
    /// Builds a result from already-cleaned text, normalizing the link and
    /// deriving the display host from it.
    pub fn new(
        source_type: SourceType,
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: &str,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        let link = normalize_link(link);
        Self {
            source_type,
            title: title.into(),
            snippet: snippet.into(),
            display_host: display_host(&link),
            link,
            published_at,
        }
    }
}

/// Request diagnostics reported next to a backend's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BackendDebug {
    pub status: Option<u16>,
    /// Request URL with credentials redacted.
    pub url: String,
    pub count: Option<usize>,
}

/// What one backend call produced. Never an `Err`: failures ride along in
/// `error` so one backend cannot sink an aggregated search.
#[derive(Debug, Clone, Default)]
pub struct BackendOutcome {
    pub items: Vec<SearchResult>,
    pub error: Option<BackendError>,
    pub debug: Option<BackendDebug>,
}

impl BackendOutcome {
    pub fn success(items: Vec<SearchResult>, debug: BackendDebug) -> Self {
        Self {
            items,
            error: None,
            debug: Some(debug),
        }
    }

    pub fn failure(error: BackendError, debug: Option<BackendDebug>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error),
            debug,
        }
    }
}
