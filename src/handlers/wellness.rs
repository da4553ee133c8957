//! `POST /api/wellness/chat`
//!
//! Wellness conversation endpoint. The reply is recorded in the caller's
//! wellness log on a best-effort basis.

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::handlers::completion::{AiOutcome, AiTextResponse, complete, parse_json_body};
use crate::metrics::Endpoint;
use crate::middleware::RequestId;
use crate::prompt::{Intent, PromptRequest, build_prompt, is_blank};
use crate::storage::WellnessChatEntry;
use axum::{Extension, Json, body::Bytes, extract::State};
use serde::Deserialize;
use serde_json::Value;

/// Message of the 500 returned when the handler fails unexpectedly
pub const INTERNAL_ERROR_MESSAGE: &str = "Error processing wellness chat";

/// Text returned when no provider key is configured
pub const UNCONFIGURED_TIP: &str = "AI support is temporarily unavailable. Here's a gentle tip: Take a short 5-min walk and try a breathing exercise.";

/// Text returned when both models failed
pub const PROVIDER_APOLOGY: &str =
    "Sorry, I could not reach the AI right now. Please try again later.";

/// Request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WellnessChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Overrides the default wellness intent unless blank
    #[serde(default)]
    pub intent: Option<Value>,
}

impl WellnessChatRequest {
    /// Intent to build the prompt from
    pub fn resolved_intent(&self) -> Intent {
        match &self.intent {
            Some(intent) if !is_blank(intent) => {
                serde_json::from_value(intent.clone()).unwrap_or_default()
            }
            _ => Intent::new("wellness", self.message.clone().unwrap_or_default()),
        }
    }
}

/// Handler for POST /api/wellness/chat
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> AppResult<Json<AiTextResponse>> {
    let request = match parse_json_body(&body)? {
        Value::Null => WellnessChatRequest::default(),
        value => serde_json::from_value::<WellnessChatRequest>(value)
            .map_err(|e| AppError::Validation(format!("Invalid wellness chat request: {}", e)))?,
    };

    let prompt = build_prompt(&PromptRequest::Structured(request.resolved_intent()));
    let outcome = complete(&state, &prompt).await;
    state
        .metrics()
        .record_request(Endpoint::WellnessChat, outcome.request_outcome());

    let text = match outcome {
        AiOutcome::Generated(completion) => completion.text,
        AiOutcome::Unconfigured => {
            tracing::warn!(
                request_id = %request_id,
                "Provider API key not configured, returning wellness tip"
            );
            UNCONFIGURED_TIP.to_string()
        }
        AiOutcome::ProviderFailed(error) => {
            tracing::error!(
                request_id = %request_id,
                model = %error.model(),
                error = %error,
                "Wellness chat generation failed"
            );
            PROVIDER_APOLOGY.to_string()
        }
    };

    let entry = WellnessChatEntry {
        user_id: user.user_id,
        user_message: request.message.unwrap_or_default(),
        ai_text: text.clone(),
    };
    if let Err(error) = state.interaction_log().record(&entry).await {
        tracing::warn!(
            request_id = %request_id,
            user_id = user.user_id,
            error = %error,
            "Failed to record wellness chat"
        );
        state.metrics().record_log_failure();
    }

    Ok(Json(AiTextResponse { text }))
}
