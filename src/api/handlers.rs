use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, instrument};

use crate::{
    api::{
        dtos::{
            BackendSearchQuery, BackendSearchResponse, ErrorResponse, ExtractQuery, SearchQuery,
            SearchResponse,
        },
        errors::ApiError,
        extractors::ApiQuery,
    },
    app_state::AppState,
    extractor::{self, ExtractOptions, ExtractedArticle},
    search::SourceType,
};

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Aggregated search across both backends, newest first.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Merged results, possibly with per-backend errors", body = SearchResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "Unexpected fault", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = required(params.q).ok_or(ApiError::MissingQuery)?;
    let result = state.aggregator.aggregated_search(&query).await?;
    Ok(Json(SearchResponse::from(result)))
}

/// Search a single backend. Backend failures are the response here, not
/// metadata.
#[utoipa::path(
    get,
    path = "/api/search/{backend}",
    tag = "search",
    params(
        ("backend" = String, Path, description = "`google` or `naver`"),
        BackendSearchQuery
    ),
    responses(
        (status = 200, description = "Results from one backend", body = BackendSearchResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 404, description = "Unknown backend", body = ErrorResponse),
        (status = 500, description = "Backend not configured", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or malformed response", body = ErrorResponse)
    )
)]
#[instrument(skip(state, params))]
pub async fn search_backend(
    State(state): State<AppState>,
    Path(backend): Path<String>,
    ApiQuery(params): ApiQuery<BackendSearchQuery>,
) -> Result<Json<BackendSearchResponse>, ApiError> {
    let source = SourceType::from_name(&backend).ok_or(ApiError::UnknownBackend(backend))?;
    let limit = params.limit();
    let query = required(params.q).ok_or(ApiError::MissingQuery)?;

    let outcome = state.backend(source).search(&query).await;
    if let Some(err) = outcome.error {
        return Err(ApiError::Backend(err));
    }

    let mut items = outcome.items;
    items.truncate(limit);
    info!(%source, count = items.len(), "single backend search complete");
    Ok(Json(BackendSearchResponse { items }))
}

/// Fetch an article and return its readable body.
#[utoipa::path(
    get,
    path = "/api/extract",
    tag = "extract",
    params(ExtractQuery),
    responses(
        (status = 200, description = "Extracted article", body = ExtractedArticle),
        (status = 400, description = "Missing/invalid url or upstream fetch refused", body = ErrorResponse),
        (status = 422, description = "No article text could be extracted", body = ErrorResponse),
        (status = 500, description = "Unexpected fault", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn extract(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ExtractQuery>,
) -> Result<Json<ExtractedArticle>, ApiError> {
    let options = ExtractOptions {
        max_chars: params.max_chars(state.extract_max_chars),
    };
    let url = required(params.url).ok_or(ApiError::MissingUrl)?;

    let article = extractor::extract(&state.fetcher, &url, &options).await?;
    Ok(Json(article))
}
