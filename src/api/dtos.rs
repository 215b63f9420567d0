use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::search::{AggregatedResultSet, BackendDebug, SearchResult, SourceType};

/// Default and maximum result counts for single-backend search.
pub const DEFAULT_BACKEND_LIMIT: usize = 5;
pub const MAX_BACKEND_LIMIT: usize = 10;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search terms.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BackendSearchQuery {
    /// Search terms.
    pub q: Option<String>,
    /// Number of results, 1..=10 (default 5).
    pub limit: Option<usize>,
}

impl BackendSearchQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_BACKEND_LIMIT)
            .clamp(1, MAX_BACKEND_LIMIT)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ExtractQuery {
    /// Article URL to fetch.
    pub url: Option<String>,
    /// Truncate the returned text to this many characters.
    pub max_chars: Option<usize>,
    /// Return the whole body even if a default ceiling is configured.
    pub full: Option<bool>,
}

impl ExtractQuery {
    /// `full=true` wins over `maxChars`, which wins over the server default.
    pub fn max_chars(&self, server_default: Option<usize>) -> Option<usize> {
        if self.full.unwrap_or(false) {
            return None;
        }
        self.max_chars.or(server_default).filter(|&n| n > 0)
    }
}

/// Aggregated search response. Per-backend error/debug keys are present
/// only when the backend reported them.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<Object>)]
    pub google_error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<Object>)]
    pub naver_error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub google_debug: Option<BackendDebug>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub naver_debug: Option<BackendDebug>,
}

impl From<AggregatedResultSet> for SearchResponse {
    fn from(result: AggregatedResultSet) -> Self {
        let mut response = SearchResponse {
            items: Vec::new(),
            google_error: None,
            naver_error: None,
            google_debug: None,
            naver_debug: None,
        };

        for report in &result.reports {
            let error = report.error.as_ref().map(|e| e.payload());
            let debug = report.debug.clone();
            match report.source {
                SourceType::Google => {
                    response.google_error = error;
                    response.google_debug = debug;
                }
                SourceType::Naver => {
                    response.naver_error = error;
                    response.naver_debug = debug;
                }
            }
        }

        response.items = result.items;
        response
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackendSearchResponse {
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub upstream_status: Option<u16>,
}
