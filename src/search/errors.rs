use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

use crate::search::types::SourceType;

/// Why a single backend call produced no items. Always recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Missing {} env vars", .backend.name().to_uppercase())]
    MissingCredentials { backend: SourceType },

    #[error("{backend} request timed out after {}s", .after.as_secs())]
    Timeout { backend: SourceType, after: Duration },

    #[error("{backend} request failed: {message}")]
    Transport {
        backend: SourceType,
        message: String,
    },

    #[error("{backend} request failed with status {status}")]
    Upstream {
        backend: SourceType,
        status: u16,
        body: Option<Value>,
    },

    #[error("{backend} returned an unexpected response shape: {message}")]
    Schema {
        backend: SourceType,
        message: String,
    },
}

impl BackendError {
    pub fn backend(&self) -> SourceType {
        match self {
            Self::MissingCredentials { backend }
            | Self::Timeout { backend, .. }
            | Self::Transport { backend, .. }
            | Self::Upstream { backend, .. }
            | Self::Schema { backend, .. } => *backend,
        }
    }

    /// Status code the upstream API answered with, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// JSON reported to clients under `googleError` / `naverError`.
    ///
    /// Upstream rejections pass the provider's own error body through so the
    /// caller sees e.g. Google's quota message verbatim.
    pub fn payload(&self) -> Value {
        match self {
            Self::MissingCredentials { .. } => Value::String(self.to_string()),
            Self::Upstream {
                body: Some(body), ..
            } => body.clone(),
            Self::Upstream {
                status, body: None, ..
            } => json!({ "status": status, "message": self.to_string() }),
            _ => json!({ "message": self.to_string() }),
        }
    }
}
