//! Error types for studydoc
//!
//! All errors implement `IntoResponse` for Axum handlers. Provider and storage
//! failures have their own enums because the handlers absorb them instead of
//! surfacing them to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unauthorized: Access token is missing")]
    MissingToken,

    #[error("Forbidden: Invalid or expired token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MissingToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::InvalidToken => (StatusCode::FORBIDDEN, self.to_string()),
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(serde_json::json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single generation attempt against the provider
///
/// Every variant names the model it came from so the dispatcher can log
/// both attempts of a fallback chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Request to model {model} failed: {reason}")]
    Transport { model: String, reason: String },

    #[error("Model {model} returned HTTP {status}: {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Model {model} returned an unusable response: {reason}")]
    MalformedResponse { model: String, reason: String },

    #[error("Request to model {model} timed out after {timeout_ms} ms")]
    Timeout { model: String, timeout_ms: u64 },
}

impl ProviderError {
    /// Model identifier the failed attempt targeted
    pub fn model(&self) -> &str {
        match self {
            Self::Transport { model, .. }
            | Self::Status { model, .. }
            | Self::MalformedResponse { model, .. }
            | Self::Timeout { model, .. } => model,
        }
    }
}

/// Failure writing to or reading from the interaction log
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_creates() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_validation_error_response_status() {
        let response = AppError::Validation("bad body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let response = AppError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_token_is_forbidden() {
        let response = AppError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_response_status() {
        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_hides_detail_from_clients() {
        let response = AppError::Config("secret path".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_provider_error_reports_model() {
        let err = ProviderError::Timeout {
            model: "gemini-1.5-pro".to_string(),
            timeout_ms: 30_000,
        };
        assert_eq!(err.model(), "gemini-1.5-pro");
        assert_eq!(
            err.to_string(),
            "Request to model gemini-1.5-pro timed out after 30000 ms"
        );
    }

    #[test]
    fn test_provider_status_error_message() {
        let err = ProviderError::Status {
            model: "gemini-1.5-flash".to_string(),
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model gemini-1.5-flash returned HTTP 404: not found"
        );
    }
}
