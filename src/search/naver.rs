use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::{Config, Credentials};
use crate::search::backend::{REQUEST_CEILING, SearchBackend, endpoint, send_json};
use crate::search::errors::BackendError;
use crate::search::normalize::{parse_published_at, strip_tags};
use crate::search::types::{BackendDebug, BackendOutcome, SearchResult, SourceType};

const SEARCH_PATH: &str = "/v1/search/news.json";
const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    pub_date: Option<String>,
}

/// Naver News search. Titles and descriptions arrive with `<b>` highlight
/// markup and HTML entities, both removed here.
pub struct NaverBackend {
    client: Client,
    credentials: Option<Credentials>,
    api_base: String,
    timeout: Duration,
}

impl NaverBackend {
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
            config.naver().cloned(),
            config.naver_api_base(),
            config.search_timeout(),
        )
    }

    fn map_items(items: Vec<NaverItem>) -> Vec<SearchResult> {
        items
            .into_iter()
            .filter_map(|item| {
                let link = if item.link.trim().is_empty() {
                    item.originallink.trim()
                } else {
                    item.link.trim()
                };
                if link.is_empty() {
                    return None;
                }
                Some(SearchResult::new(
                    SourceType::Naver,
                    strip_tags(&item.title),
                    strip_tags(&item.description),
                    link,
                    item.pub_date.as_deref().and_then(parse_published_at),
                ))
            })
            .take(REQUEST_CEILING)
            .collect()
    }
}

#[async_trait]
impl SearchBackend for NaverBackend {
    fn source(&self) -> SourceType {
        SourceType::Naver
    }

    #[instrument(skip(self), fields(backend = "naver"))]
    async fn search(&self, query: &str) -> BackendOutcome {
        let Some(credentials) = &self.credentials else {
            warn!("naver credentials not configured");
            return BackendOutcome::failure(
                BackendError::MissingCredentials {
                    backend: SourceType::Naver,
                },
                None,
            );
        };

        let mut url = match endpoint(SourceType::Naver, &self.api_base, SEARCH_PATH) {
            Ok(url) => url,
            Err(err) => return BackendOutcome::failure(err, None),
        };
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("display", &REQUEST_CEILING.to_string())
            .append_pair("start", "1")
            .append_pair("sort", "date");
        let debug_url = url.to_string();

        let request = self
            .client
            .get(url)
            .header(CLIENT_ID_HEADER, credentials.id())
            .header(CLIENT_SECRET_HEADER, credentials.secret());

        match send_json::<NaverResponse>(SourceType::Naver, request, self.timeout).await {
            Ok(response) => {
                let items = Self::map_items(response.body.items);
                info!(count = items.len(), "naver search complete");
                let debug = BackendDebug {
                    status: Some(response.status),
                    url: debug_url,
                    count: Some(items.len()),
                };
                BackendOutcome::success(items, debug)
            }
            Err(err) => {
                warn!(error = %err, "naver search failed");
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
