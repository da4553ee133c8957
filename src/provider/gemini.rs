//! Gemini `generateContent` client
//!
//! Speaks the Generative Language REST API:
//! `POST {base_url}/models/{model}:generateContent` with the key in the
//! `x-goog-api-key` header.

use crate::error::ProviderError;
use crate::provider::GenerativeModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest error body kept in a `ProviderError::Status`
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// HTTP client for the Gemini API
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against `base_url` (e.g. `https://generativelanguage.googleapis.com/v1beta`)
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %model,
            prompt_length = prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint_url(model))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport {
                model: model.to_string(),
                reason: format!("failed to read response body: {}", e),
            })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                model: model.to_string(),
                status: status.as_u16(),
                body: body_text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body_text).map_err(|e| ProviderError::MalformedResponse {
                model: model.to_string(),
                reason: format!("invalid JSON: {}", e),
            })?;

        extract_text(parsed).map_err(|reason| ProviderError::MalformedResponse {
            model: model.to_string(),
            reason,
        })
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, String> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => format!("prompt was blocked ({})", reason),
            None => "response contained no candidates".to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err("first candidate contained no text".to_string());
    }

    Ok(text)
}
