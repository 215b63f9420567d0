//! Configuration handling for the application.
//!
//! Everything comes from environment variables. The `api` binary loads
//! `.env.local` and `.env` into the environment before calling
//! [`Config::from_env`], so local credentials never have to be exported by hand.
//!
//! Missing search credentials are not a configuration error: a backend without
//! credentials degrades to a reported per-backend error at query time.

use std::env;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

/// Environment variable names. Public so tests can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_GOOGLE_CSE_CX: &str = "GOOGLE_CSE_CX";
pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
pub const ENV_SEARCH_TIMEOUT_SECS: &str = "SEARCH_TIMEOUT_SECS";
pub const ENV_SEARCH_RESULT_CAP: &str = "SEARCH_RESULT_CAP";
pub const ENV_EXTRACT_MAX_CHARS: &str = "EXTRACT_MAX_CHARS";
pub const ENV_GOOGLE_API_BASE: &str = "GOOGLE_API_BASE";
pub const ENV_NAVER_API_BASE: &str = "NAVER_API_BASE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_GOOGLE_API_BASE: &str = "https://www.googleapis.com";
pub const DEFAULT_NAVER_API_BASE: &str = "https://openapi.naver.com";
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 12;
const MIN_SEARCH_TIMEOUT_SECS: u64 = 8;
const MAX_SEARCH_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_RESULT_CAP: usize = 10;

/// An API key/secret pair. Both halves are guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    id: String,
    secret: String,
}

impl Credentials {
    /// Returns `None` unless both halves are present and non-blank.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let secret = secret.into();
        if id.trim().is_empty() || secret.trim().is_empty() {
            return None;
        }
        Some(Self { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

// Secrets stay out of `{:?}` output, which ends up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    google: Option<Credentials>,
    naver: Option<Credentials>,
    google_api_base: String,
    naver_api_base: String,
    search_timeout: Duration,
    result_cap: usize,
    extract_max_chars: Option<usize>,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let google = credentials_from_env(ENV_GOOGLE_API_KEY, ENV_GOOGLE_CSE_CX);
        let naver = credentials_from_env(ENV_NAVER_CLIENT_ID, ENV_NAVER_CLIENT_SECRET);

        let google_api_base = env::var(ENV_GOOGLE_API_BASE)
            .unwrap_or_else(|_| DEFAULT_GOOGLE_API_BASE.to_string());
        let naver_api_base =
            env::var(ENV_NAVER_API_BASE).unwrap_or_else(|_| DEFAULT_NAVER_API_BASE.to_string());

        let timeout_secs = parse_env::<u64>(ENV_SEARCH_TIMEOUT_SECS, "search_timeout_secs")?
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS)
            .clamp(MIN_SEARCH_TIMEOUT_SECS, MAX_SEARCH_TIMEOUT_SECS);

        let result_cap = parse_env::<usize>(ENV_SEARCH_RESULT_CAP, "search_result_cap")?
            .unwrap_or(DEFAULT_RESULT_CAP);
        if result_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search_result_cap",
                reason: "must be greater than zero".to_string(),
            });
        }

        let extract_max_chars = parse_env::<usize>(ENV_EXTRACT_MAX_CHARS, "extract_max_chars")?
            .filter(|&n| n > 0);

        Ok(Self {
            bind_addr,
            google,
            naver,
            google_api_base,
            naver_api_base,
            search_timeout: Duration::from_secs(timeout_secs),
            result_cap,
            extract_max_chars,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Google Custom Search key (`id`) and engine id (`secret`).
    pub fn google(&self) -> Option<&Credentials> {
        self.google.as_ref()
    }
    /// Naver Open API client id and secret.
    pub fn naver(&self) -> Option<&Credentials> {
        self.naver.as_ref()
    }
    pub fn google_api_base(&self) -> &str {
        &self.google_api_base
    }
    pub fn naver_api_base(&self) -> &str {
        &self.naver_api_base
    }
    /// Per-backend request timeout, always within 8..=12 seconds.
    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }
    /// Maximum number of aggregated results.
    pub fn result_cap(&self) -> usize {
        self.result_cap
    }
    /// Default extraction truncation ceiling. `None` returns full article text.
    pub fn extract_max_chars(&self) -> Option<usize> {
        self.extract_max_chars
    }

    /// Development defaults: no credentials, public API endpoints.
    pub fn default() -> Self {
        // not `Default` impl yet to keep explicit semantics
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            google: None,
            naver: None,
            google_api_base: DEFAULT_GOOGLE_API_BASE.to_string(),
            naver_api_base: DEFAULT_NAVER_API_BASE.to_string(),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            result_cap: DEFAULT_RESULT_CAP,
            extract_max_chars: None,
        }
    }

    pub fn with_google(mut self, credentials: Option<Credentials>, api_base: &str) -> Self {
        self.google = credentials;
        self.google_api_base = api_base.to_string();
        self
    }

    pub fn with_naver(mut self, credentials: Option<Credentials>, api_base: &str) -> Self {
        self.naver = credentials;
        self.naver_api_base = api_base.to_string();
        self
    }

    pub fn with_extract_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.extract_max_chars = max_chars;
        self
    }
}

fn credentials_from_env(id_var: &str, secret_var: &str) -> Option<Credentials> {
    let id = env::var(id_var).ok()?;
    let secret = env::var(secret_var).ok()?;
    Credentials::new(id, secret)
}

fn parse_env<T>(var: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
