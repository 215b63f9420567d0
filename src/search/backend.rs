//! The adapter seam between the aggregator and concrete search APIs.
//!
//! Each backend (Google Custom Search, Naver News) implements
//! [`SearchBackend`]. Implementations own their request construction and
//! response mapping, and fold every failure into the returned
//! [`BackendOutcome`] instead of erroring, so the aggregator can always
//! compose an answer from whatever succeeded.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[cfg(test)]
use mockall::automock;

use crate::fetcher::client::USER_AGENT;
use crate::search::errors::BackendError;
use crate::search::types::{BackendOutcome, SourceType};

/// Upper bound on results requested from any backend.
pub const REQUEST_CEILING: usize = 10;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Which backend this is; also keys its metadata in aggregated responses.
    fn source(&self) -> SourceType;

    /// One attempt, bounded by the backend's timeout. Never retried.
    async fn search(&self, query: &str) -> BackendOutcome;
}

/// Client shared by the JSON search backends.
pub fn api_client() -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(5))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
}

/// A decoded 2xx response.
pub(crate) struct JsonResponse<T> {
    pub status: u16,
    pub body: T,
}

/// Send `request` and decode its JSON body, all within `timeout`. The
/// in-flight request is dropped, and with it the connection, once the
/// deadline passes.
pub(crate) async fn send_json<T: DeserializeOwned>(
    backend: SourceType,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<JsonResponse<T>, BackendError> {
    let exchange = async {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, bytes))
    };

    let (status, bytes) = match tokio::time::timeout(timeout, exchange).await {
        Err(_elapsed) => {
            return Err(BackendError::Timeout {
                backend,
                after: timeout,
            });
        }
        Ok(Err(err)) if err.is_timeout() => {
            return Err(BackendError::Timeout {
                backend,
                after: timeout,
            });
        }
        Ok(Err(err)) => {
            return Err(BackendError::Transport {
                backend,
                message: err.to_string(),
            });
        }
        Ok(Ok(exchange)) => exchange,
    };

    if !status.is_success() {
        return Err(BackendError::Upstream {
            backend,
            status: status.as_u16(),
            body: serde_json::from_slice::<Value>(&bytes).ok(),
        });
    }

    let body = serde_json::from_slice::<T>(&bytes).map_err(|e| BackendError::Schema {
        backend,
        message: e.to_string(),
    })?;

    Ok(JsonResponse {
        status: status.as_u16(),
        body,
    })
}

/// `{base}{path}` as a URL, tolerating a trailing slash on `base`.
pub(crate) fn endpoint(
    backend: SourceType,
    base: &str,
    path: &str,
) -> Result<Url, BackendError> {
    Url::parse(&format!("{}{}", base.trim_end_matches('/'), path)).map_err(|e| {
        BackendError::Transport {
            backend,
            message: format!("invalid endpoint '{}': {}", base, e),
        }
    })
}

/// Copy of `url` with the named query parameters masked, for logs and debug
/// metadata.
pub(crate) fn redact(url: &Url, secret_params: &[&str]) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if secret_params.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
