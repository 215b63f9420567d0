pub mod dtos;
pub mod errors;
pub mod extractors;
pub mod handlers;

use axum::{
    Json, Router,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};
use dtos::ErrorResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::search,
        handlers::search_backend,
        handlers::extract,
        health::health_check
    ),
    components(schemas(
        dtos::SearchResponse,
        dtos::BackendSearchResponse,
        dtos::ErrorResponse,
        crate::search::SearchResult,
        crate::search::SourceType,
        crate::search::BackendDebug,
        crate::extractor::ExtractedArticle,
        health::HealthResponse
    )),
    tags(
        (name = "search", description = "News headline search"),
        (name = "extract", description = "Article text extraction"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Last-resort boundary: a panic in a handler becomes a JSON 500.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "Internal server error".to_string());
    tracing::error!(%message, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message,
            upstream_status: None,
        }),
    )
        .into_response()
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/api/search", get(handlers::search))
        .route("/api/search-mixed", get(handlers::search))
        .route("/api/search/{backend}", get(handlers::search_backend))
        .route("/api/extract", get(handlers::extract))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}
