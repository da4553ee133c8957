//! Integration tests for the unauthenticated /health and /metrics routes

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::str::FromStr;
use std::sync::Arc;
use studydoc::{
    auth::issue_token,
    config::Config,
    error::{ProviderError, StorageError},
    handlers::{self, AppState, health::HealthResponse},
    provider::GenerativeModel,
    storage::{InteractionLog, WellnessChatEntry},
};
use tower::ServiceExt;

struct FailingModel;

#[async_trait]
impl GenerativeModel for FailingModel {
    async fn generate(
        &self,
        _api_key: &str,
        model: &str,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            model: model.to_string(),
            status: 500,
            body: String::new(),
        })
    }
}

struct NullLog;

#[async_trait]
impl InteractionLog for NullLog {
    async fn record(&self, _entry: &WellnessChatEntry) -> Result<(), StorageError> {
        Ok(())
    }
}

fn create_app(with_key: bool) -> Router {
    let key_line = if with_key { "api_key = \"k\"" } else { "" };
    let toml = format!(
        "[server]\nhost = \"127.0.0.1\"\nport = 5000\n\n[provider]\n{}\n\n[auth]\njwt_secret = \"s\"\n",
        key_line
    );
    let config = Config::from_str(&toml).expect("should parse test config");
    let state = AppState::new(Arc::new(config), Arc::new(FailingModel), Arc::new(NullLog))
        .expect("should create AppState");
    handlers::router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let (status, body) = get(create_app(true), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(health.status, "OK");
    assert_eq!(health.provider, "configured");
}

#[tokio::test]
async fn test_health_reports_unconfigured_provider() {
    let (status, body) = get(create_app(false), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(health.provider, "unconfigured");
}

#[tokio::test]
async fn test_metrics_reflect_fallbacks() {
    let app = create_app(true);
    let token = issue_token("s", 1, 600).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/gemini")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(r#"{"prompt":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("studydoc_model_fallbacks_total 1"));
    assert!(body.contains(
        r#"studydoc_requests_total{endpoint="generate",outcome="provider_failed"} 1"#
    ));
    assert!(body.contains(r#"studydoc_model_attempts_total{outcome="failure",role="primary"} 1"#));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get(create_app(true), "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
