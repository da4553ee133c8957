//! `POST /api/gemini`
//!
//! Accepts either `{ "prompt": "..." }` or `{ "intent": {...} }` and always
//! answers 200 with `{ "text": ... }` once the body has parsed, even when no
//! provider key is configured or both models fail.

use crate::auth::AuthenticatedUser;
use crate::error::AppResult;
use crate::handlers::AppState;
use crate::handlers::completion::{AiOutcome, AiTextResponse, complete, parse_json_body};
use crate::metrics::Endpoint;
use crate::middleware::RequestId;
use crate::prompt::{PromptRequest, build_prompt};
use axum::{Extension, Json, body::Bytes, extract::State};

/// Message of the 500 returned when the handler fails unexpectedly
pub const INTERNAL_ERROR_MESSAGE: &str = "Error processing request with Gemini";

/// Text returned when both models failed
pub const PROVIDER_APOLOGY: &str =
    "Sorry, the AI provider is currently unavailable. Please try again in a few moments.";

const UNAVAILABLE_PREAMBLE: &str = "AI features are temporarily unavailable. Meanwhile, here's a short helpful response based on your input:\n\n";

/// Number of trailing prompt lines echoed back when the key is missing
const ECHOED_PROMPT_LINES: usize = 6;

/// Guidance text for an unconfigured provider: the preamble plus the tail of the prompt
pub fn unavailable_guidance(prompt: &str) -> String {
    let lines: Vec<&str> = prompt.split('\n').collect();
    let tail = &lines[lines.len().saturating_sub(ECHOED_PROMPT_LINES)..];
    format!("{}{}", UNAVAILABLE_PREAMBLE, tail.join("\n"))
}

/// Handler for POST /api/gemini
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> AppResult<Json<AiTextResponse>> {
    let request = PromptRequest::from_json(&parse_json_body(&body)?);
    let prompt = build_prompt(&request);

    tracing::debug!(
        request_id = %request_id,
        user_id = user.user_id,
        module = request.module_kind().map(|kind| kind.as_str()).unwrap_or("raw"),
        prompt_length = prompt.len(),
        "Built prompt"
    );

    let outcome = complete(&state, &prompt).await;
    state
        .metrics()
        .record_request(Endpoint::Generate, outcome.request_outcome());

    let text = match outcome {
        AiOutcome::Generated(completion) => {
            tracing::info!(
                request_id = %request_id,
                model = %completion.model,
                fell_back = completion.fell_back,
                "Generated response"
            );
            completion.text
        }
        AiOutcome::Unconfigured => {
            tracing::warn!(
                request_id = %request_id,
                "Provider API key not configured, returning guidance text"
            );
            unavailable_guidance(&prompt)
        }
        AiOutcome::ProviderFailed(error) => {
            tracing::error!(
                request_id = %request_id,
                model = %error.model(),
                error = %error,
                "All models failed"
            );
            PROVIDER_APOLOGY.to_string()
        }
    };

    Ok(Json(AiTextResponse { text }))
}
