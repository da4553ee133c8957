//! Shared generation flow for the AI endpoints
//!
//! Both endpoints check the configured key, run the dispatcher, and map the
//! result to fail-soft text. Only the wording differs per endpoint.

use crate::error::{AppError, AppResult, ProviderError};
use crate::handlers::AppState;
use crate::metrics::RequestOutcome;
use crate::provider::Completion;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of both AI endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTextResponse {
    pub text: String,
}

/// What happened when we asked the provider
#[derive(Debug)]
pub enum AiOutcome {
    Generated(Completion),
    /// No usable API key is configured
    Unconfigured,
    /// Both models failed; carries the last error
    ProviderFailed(ProviderError),
}

impl AiOutcome {
    pub fn request_outcome(&self) -> RequestOutcome {
        match self {
            Self::Generated(_) => RequestOutcome::Generated,
            Self::Unconfigured => RequestOutcome::Unconfigured,
            Self::ProviderFailed(_) => RequestOutcome::ProviderFailed,
        }
    }
}

/// Run `prompt` through the dispatcher unless the key is missing
pub async fn complete(state: &AppState, prompt: &str) -> AiOutcome {
    let Some(api_key) = state.config().provider.api_key() else {
        return AiOutcome::Unconfigured;
    };

    match state
        .dispatcher()
        .dispatch(state.provider(), api_key, prompt)
        .await
    {
        Ok(completion) => AiOutcome::Generated(completion),
        Err(error) => AiOutcome::ProviderFailed(error),
    }
}

/// Parse a raw request body as JSON
///
/// An empty (or whitespace-only) body is `Value::Null`.
///
/// # Errors
///
/// Returns `AppError::Validation` when the body is not valid JSON.
pub fn parse_json_body(body: &Bytes) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {}", e)))
}
