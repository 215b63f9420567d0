use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::DEFAULT_RESULT_CAP;
use crate::search::backend::SearchBackend;
use crate::search::errors::BackendError;
use crate::search::normalize::normalize_link;
use crate::search::types::{BackendDebug, BackendOutcome, SearchResult, SourceType};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Missing query ?q=")]
    MissingQuery,
}

/// Per-backend metadata carried next to the merged items.
#[derive(Debug, Clone)]
pub struct BackendReport {
    pub source: SourceType,
    pub error: Option<BackendError>,
    pub debug: Option<BackendDebug>,
}

/// Deduplicated, recency-ordered results of one aggregated search.
#[derive(Debug, Clone)]
pub struct AggregatedResultSet {
    pub items: Vec<SearchResult>,
    pub reports: Vec<BackendReport>,
}

impl AggregatedResultSet {
    pub fn report(&self, source: SourceType) -> Option<&BackendReport> {
        self.reports.iter().find(|r| r.source == source)
    }
}

/// Fans a query out to two backends and merges what comes back.
///
/// `primary` results are concatenated first, so they win ties when both
/// backends return the same link.
#[derive(Clone)]
pub struct Aggregator {
    primary: Arc<dyn SearchBackend>,
    secondary: Arc<dyn SearchBackend>,
    result_cap: usize,
}

impl Aggregator {
    pub fn new(primary: Arc<dyn SearchBackend>, secondary: Arc<dyn SearchBackend>) -> Self {
        Self {
            primary,
            secondary,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    pub fn with_result_cap(mut self, result_cap: usize) -> Self {
        self.result_cap = result_cap.max(1);
        self
    }

    /// Query both backends concurrently and wait for both. Backend failures
    /// are reported, never propagated.
    #[instrument(skip(self))]
    pub async fn aggregated_search(
        &self,
        query: &str,
    ) -> Result<AggregatedResultSet, AggregateError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AggregateError::MissingQuery);
        }

        let (first, second) = tokio::join!(self.primary.search(query), self.secondary.search(query));

        let reports = vec![
            report(self.primary.source(), &first),
            report(self.secondary.source(), &second),
        ];

        let items = merge_results([first.items, second.items], self.result_cap);
        info!(
            count = items.len(),
            failed_backends = reports.iter().filter(|r| r.error.is_some()).count(),
            "aggregated search complete"
        );

        Ok(AggregatedResultSet { items, reports })
    }
}

fn report(source: SourceType, outcome: &BackendOutcome) -> BackendReport {
    BackendReport {
        source,
        error: outcome.error.clone(),
        debug: outcome.debug.clone(),
    }
}

/// Concatenate, drop repeated links (first occurrence wins), order newest
/// first with undated items last, and keep at most `cap`.
pub fn merge_results<I>(lists: I, cap: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = Vec<SearchResult>>,
{
    let mut seen = HashSet::new();
    let mut merged: Vec<SearchResult> = lists
        .into_iter()
        .flatten()
        .filter(|item| {
            let key = normalize_link(&item.link);
            !key.is_empty() && seen.insert(key)
        })
        .collect();

    let before_sort = merged.len();
    // Stable: equal timestamps keep concatenation order. `None` < `Some`, so
    // comparing in reverse puts undated items at the end.
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged.truncate(cap);
    debug!(unique = before_sort, kept = merged.len(), "merged results");

    merged
}
