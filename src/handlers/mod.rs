//! HTTP request handlers for the studydoc API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::{request_id_middleware, require_bearer};
use crate::provider::{GenerativeModel, ModelDispatcher};
use crate::storage::InteractionLog;
use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub mod completion;
pub mod generate;
pub mod health;
pub mod metrics;
pub mod wellness;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    provider: Arc<dyn GenerativeModel>,
    dispatcher: Arc<ModelDispatcher>,
    interaction_log: Arc<dyn InteractionLog>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState
    ///
    /// Returns an error if metrics registration fails.
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn GenerativeModel>,
        interaction_log: Arc<dyn InteractionLog>,
    ) -> AppResult<Self> {
        let metrics = Arc::new(
            Metrics::new()
                .map_err(|e| AppError::Internal(format!("Failed to initialize metrics: {}", e)))?,
        );
        let dispatcher = Arc::new(ModelDispatcher::from_config(
            &config.provider,
            metrics.clone(),
        ));

        Ok(Self {
            config,
            provider,
            dispatcher,
            interaction_log,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the provider client
    pub fn provider(&self) -> &dyn GenerativeModel {
        self.provider.as_ref()
    }

    /// Get reference to the model dispatcher
    pub fn dispatcher(&self) -> &ModelDispatcher {
        &self.dispatcher
    }

    /// Get reference to the interaction log
    pub fn interaction_log(&self) -> &dyn InteractionLog {
        self.interaction_log.as_ref()
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the application router
///
/// `/api/*` routes require a bearer token; `/health` and `/metrics` do not.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/gemini",
            post(generate::handler).layer(internal_error_layer(generate::INTERNAL_ERROR_MESSAGE)),
        )
        .route(
            "/wellness/chat",
            post(wellness::handler).layer(internal_error_layer(wellness::INTERNAL_ERROR_MESSAGE)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Turn a panic inside a handler into a 500 with a generic message
pub fn internal_error_layer(
    message: &'static str,
) -> CatchPanicLayer<impl Fn(Box<dyn std::any::Any + Send + 'static>) -> Response + Clone> {
    CatchPanicLayer::custom(move |panic: Box<dyn std::any::Any + Send + 'static>| {
        let detail = panic
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| panic.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        tracing::error!(detail = %detail, "Handler failed unexpectedly");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response()
    })
}
