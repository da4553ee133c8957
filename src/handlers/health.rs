//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// "configured" when a usable provider key is present, else "unconfigured"
    pub provider: String,
}

/// Health check handler
///
/// Always 200 OK. An unconfigured provider does not make the service unhealthy
/// because the AI endpoints answer with guidance text in that case.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let provider = if state.config().provider.api_key().is_some() {
        "configured"
    } else {
        "unconfigured"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            provider: provider.to_string(),
        }),
    )
}
