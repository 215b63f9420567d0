use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::{Config, Credentials};
use crate::search::allowlist::is_recognized_news_link;
use crate::search::backend::{REQUEST_CEILING, SearchBackend, endpoint, redact, send_json};
use crate::search::errors::BackendError;
use crate::search::normalize::{collapse_whitespace, parse_published_at};
use crate::search::types::{BackendDebug, BackendOutcome, SearchResult, SourceType};

const SEARCH_PATH: &str = "/customsearch/v1";

/// Metatags consulted for a publication date, most specific first.
const DATE_METATAGS: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "og:updated_time",
    "article:modified_time",
    "date",
    "pubdate",
];

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    pagemap: Option<Pagemap>,
}

#[derive(Debug, Deserialize)]
struct Pagemap {
    #[serde(default)]
    metatags: Vec<HashMap<String, Value>>,
}

impl GoogleItem {
    fn published_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let meta = self.pagemap.as_ref()?.metatags.first()?;
        DATE_METATAGS
            .iter()
            .find_map(|tag| meta.get(*tag).and_then(Value::as_str))
            .and_then(parse_published_at)
    }
}

/// Google Custom Search JSON API, restricted to recognized publishers.
///
/// Credentials are the API key (`id`) and the search engine id (`secret`).
pub struct GoogleBackend {
    client: Client,
    credentials: Option<Credentials>,
    api_base: String,
    timeout: Duration,
}

impl GoogleBackend {
    pub fn new(
        client: Client,
        credentials: Option<Credentials>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            credentials,
            api_base: api_base.into(),
            timeout,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.google().cloned(),
            config.google_api_base(),
            config.search_timeout(),
        )
    }

    fn map_items(items: Vec<GoogleItem>) -> Vec<SearchResult> {
        items
            .into_iter()
            .filter(|item| !item.link.trim().is_empty() && is_recognized_news_link(&item.link))
            .map(|item| {
                let published_at = item.published_at();
                SearchResult::new(
                    SourceType::Google,
                    collapse_whitespace(&item.title),
                    collapse_whitespace(&item.snippet),
                    &item.link,
                    published_at,
                )
            })
            .take(REQUEST_CEILING)
            .collect()
    }
}

#[async_trait]
impl SearchBackend for GoogleBackend {
    fn source(&self) -> SourceType {
        SourceType::Google
    }

    #[instrument(skip(self), fields(backend = "google"))]
    async fn search(&self, query: &str) -> BackendOutcome {
        let Some(credentials) = &self.credentials else {
            warn!("google credentials not configured");
            return BackendOutcome::failure(
                BackendError::MissingCredentials {
                    backend: SourceType::Google,
                },
                None,
            );
        };

        let mut url = match endpoint(SourceType::Google, &self.api_base, SEARCH_PATH) {
            Ok(url) => url,
            Err(err) => return BackendOutcome::failure(err, None),
        };
        url.query_pairs_mut()
            .append_pair("key", credentials.id())
            .append_pair("cx", credentials.secret())
            .append_pair("q", query)
            .append_pair("num", &REQUEST_CEILING.to_string())
            .append_pair("sort", "date")
            .append_pair("hl", "ko")
            .append_pair("gl", "kr");
        let debug_url = redact(&url, &["key"]);

        match send_json::<GoogleResponse>(SourceType::Google, self.client.get(url), self.timeout)
            .await
        {
            Ok(response) => {
                let upstream_count = response.body.items.len();
                let items = Self::map_items(response.body.items);
                info!(upstream_count, kept = items.len(), "google search complete");
                let debug = BackendDebug {
                    status: Some(response.status),
                    url: debug_url,
                    count: Some(items.len()),
                };
                BackendOutcome::success(items, debug)
            }
            Err(err) => {
                warn!(error = %err, "google search failed");
                let debug = BackendDebug {
                    status: err.upstream_status(),
                    url: debug_url,
                    count: None,
                };
                BackendOutcome::failure(err, Some(debug))
            }
        }
    }
}
