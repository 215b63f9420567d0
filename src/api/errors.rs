use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::dtos::ErrorResponse;
use crate::extractor::ExtractError;
use crate::fetcher::FetchError;
use crate::search::{AggregateError, BackendError};

/// Every way a request can fail, mapped to a status code at the boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing query ?q=")]
    MissingQuery,

    #[error("Missing ?url=")]
    MissingUrl,

    #[error("Unknown search backend: {0}")]
    UnknownBackend(String),

    #[error(transparent)]
    Backend(BackendError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::MissingQuery => ApiError::MissingQuery,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery | ApiError::MissingUrl | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownBackend(_) => StatusCode::NOT_FOUND,
            ApiError::Backend(err) => match err {
                BackendError::MissingCredentials { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                BackendError::Upstream { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                BackendError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                BackendError::Transport { .. } | BackendError::Schema { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            ApiError::Extract(ExtractError::NoContent) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Extract(ExtractError::Fetch(err)) => match err {
                FetchError::Http { .. } => StatusCode::BAD_REQUEST,
                err if err.is_invalid_input() => StatusCode::BAD_REQUEST,
                FetchError::UnsupportedContentType(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        // Upstream search rejections echo the provider's payload under a
        // backend-specific key, e.g. `{ "naverError": {...} }`.
        if let ApiError::Backend(err @ BackendError::Upstream { .. }) = &self {
            let mut body = Map::new();
            body.insert(format!("{}Error", err.backend().name()), err.payload());
            return (status, Json(Value::Object(body))).into_response();
        }

        let upstream_status = match &self {
            ApiError::Extract(ExtractError::Fetch(err)) => {
                err.upstream_status().map(|s| s.as_u16())
            }
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                upstream_status,
            }),
        )
            .into_response()
    }
}
