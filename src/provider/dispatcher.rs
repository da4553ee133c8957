//! Primary/secondary model fallback
//!
//! A strict two-step chain: one attempt against the primary model, and only if
//! that fails, one attempt against the secondary. No backoff and no state
//! carried between requests.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::metrics::{Metrics, ModelRole};
use crate::provider::GenerativeModel;
use std::sync::Arc;
use std::time::Duration;

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// Model that produced the text
    pub model: String,
    /// True when the primary failed and the secondary answered
    pub fell_back: bool,
}

/// Runs the primary → secondary fallback chain
pub struct ModelDispatcher {
    primary: String,
    secondary: String,
    attempt_timeout: Duration,
    metrics: Arc<Metrics>,
}

impl ModelDispatcher {
    /// Create a dispatcher for an explicit model pair
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        attempt_timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            attempt_timeout,
            metrics,
        }
    }

    /// Create a dispatcher from provider configuration
    pub fn from_config(config: &ProviderConfig, metrics: Arc<Metrics>) -> Self {
        Self::new(
            config.primary_model.clone(),
            config.secondary_model.clone(),
            Duration::from_secs(config.attempt_timeout_seconds),
            metrics,
        )
    }

    /// Primary model identifier
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Secondary model identifier
    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    /// Generate text, falling back to the secondary model once
    ///
    /// # Errors
    ///
    /// When both attempts fail the secondary's error is returned; the primary's
    /// error is only logged.
    pub async fn dispatch(
        &self,
        provider: &dyn GenerativeModel,
        api_key: &str,
        prompt: &str,
    ) -> Result<Completion, ProviderError> {
        let primary_error = match self
            .attempt(provider, api_key, &self.primary, prompt, ModelRole::Primary)
            .await
        {
            Ok(text) => {
                return Ok(Completion {
                    text,
                    model: self.primary.clone(),
                    fell_back: false,
                });
            }
            Err(e) => e,
        };

        tracing::warn!(
            model = %self.primary,
            fallback_model = %self.secondary,
            error = %primary_error,
            "Primary model failed, trying secondary"
        );
        self.metrics.record_fallback();

        match self
            .attempt(provider, api_key, &self.secondary, prompt, ModelRole::Secondary)
            .await
        {
            Ok(text) => Ok(Completion {
                text,
                model: self.secondary.clone(),
                fell_back: true,
            }),
            Err(secondary_error) => {
                tracing::error!(
                    primary_model = %self.primary,
                    primary_error = %primary_error,
                    secondary_model = %self.secondary,
                    secondary_error = %secondary_error,
                    "Both models failed"
                );
                Err(secondary_error)
            }
        }
    }

    /// One attempt under the per-attempt deadline
    async fn attempt(
        &self,
        provider: &dyn GenerativeModel,
        api_key: &str,
        model: &str,
        prompt: &str,
        role: ModelRole,
    ) -> Result<String, ProviderError> {
        let started = std::time::Instant::now();
        let result =
            match tokio::time::timeout(self.attempt_timeout, provider.generate(api_key, model, prompt))
                .await
            {
                Ok(result) => result,
                Err(_elapsed) => Err(ProviderError::Timeout {
                    model: model.to_string(),
                    timeout_ms: u64::try_from(self.attempt_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                }),
            };

        self.metrics.record_attempt(role, result.is_ok());
        tracing::debug!(
            model = %model,
            role = role.as_str(),
            success = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model attempt finished"
        );

        result
    }
}
