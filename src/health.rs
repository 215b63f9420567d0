use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::search::SourceType;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    google: String,
    naver: String,
}

fn credential_status(state: &AppState, source: SourceType) -> String {
    if state.configured_backends.contains(&source) {
        "configured".to_string()
    } else {
        "missing credentials".to_string()
    }
}

/// Liveness probe. Missing credentials are reported but never make the
/// service unhealthy; the affected backend just reports an error per query.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("Health check passed");
    Json(HealthResponse {
        status: "OK".to_string(),
        google: credential_status(&state, SourceType::Google),
        naver: credential_status(&state, SourceType::Naver),
    })
}
