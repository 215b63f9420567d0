#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use newstype::{
    api,
    app_state::AppState,
    config::{Config, Credentials},
};

/// Config pointing both search backends at `server`.
pub fn mock_config(server: &MockServer) -> Config {
    Config::default()
        .with_google(Credentials::new("test-key", "test-cx"), &server.uri())
        .with_naver(Credentials::new("test-id", "test-secret"), &server.uri())
}

/// Config with no search credentials at all.
pub fn unconfigured() -> Config {
    Config::default()
}

pub fn test_app(config: &Config) -> Router {
    let state = AppState::from_config(config).expect("state builds");
    api::router(state)
}

/// Issue a GET against the router and decode the JSON response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
