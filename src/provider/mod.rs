//! Generative-language provider access
//!
//! `GenerativeModel` is the text-in/text-out contract the rest of the crate
//! depends on; `GeminiClient` implements it over HTTP and `ModelDispatcher`
//! layers the primary/secondary fallback chain on top.

pub mod dispatcher;
pub mod gemini;

pub use dispatcher::{Completion, ModelDispatcher};
pub use gemini::GeminiClient;

use crate::error::ProviderError;
use async_trait::async_trait;

/// Single-shot text generation against a named model
///
/// The API key is passed per call so implementations hold no credentials.
/// Implementations must not retry internally; fallback policy belongs to
/// the dispatcher.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, api_key: &str, model: &str, prompt: &str)
    -> Result<String, ProviderError>;
}
