//! Prometheus metrics collection for studydoc
//!
//! This module provides metrics instrumentation for tracking:
//! - AI requests by endpoint and outcome
//! - Model attempts by role (primary/secondary) and outcome
//! - Fallbacks to the secondary model
//! - Interaction log write failures
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// AI endpoint label
///
/// Closed set so label cardinality stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Generate,
    WellnessChat,
}

impl Endpoint {
    /// Convert endpoint to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Generate => "generate",
            Endpoint::WellnessChat => "wellness_chat",
        }
    }
}

/// How an AI request was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Model text was returned
    Generated,
    /// No usable API key; guidance text was returned
    Unconfigured,
    /// Both model attempts failed; apology text was returned
    ProviderFailed,
}

impl RequestOutcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Generated => "generated",
            RequestOutcome::Unconfigured => "unconfigured",
            RequestOutcome::ProviderFailed => "provider_failed",
        }
    }
}

/// Position of a model in the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Primary,
    Secondary,
}

impl ModelRole {
    /// Convert role to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Primary => "primary",
            ModelRole::Secondary => "secondary",
        }
    }
}

/// Metrics collector for studydoc
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    model_attempts: IntCounterVec,
    model_fallbacks: IntCounter,
    interaction_log_failures: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Labels are model roles rather than model names so a config change
        // does not create new series.
        let requests_total = IntCounterVec::new(
            Opts::new(
                "studydoc_requests_total",
                "Total number of AI requests by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;

        let model_attempts = IntCounterVec::new(
            Opts::new(
                "studydoc_model_attempts_total",
                "Total model generation attempts by role (primary/secondary) and outcome",
            ),
            &["role", "outcome"],
        )?;

        let model_fallbacks = IntCounter::with_opts(Opts::new(
            "studydoc_model_fallbacks_total",
            "Total number of requests that fell back to the secondary model",
        ))?;

        let interaction_log_failures = IntCounter::with_opts(Opts::new(
            "studydoc_interaction_log_failures_total",
            "Total number of wellness interaction log writes that failed (response unaffected)",
        ))?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(model_attempts.clone()))?;
        registry.register(Box::new(model_fallbacks.clone()))?;
        registry.register(Box::new(interaction_log_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            model_attempts,
            model_fallbacks,
            interaction_log_failures,
        })
    }

    /// Record how an AI request was answered
    pub fn record_request(&self, endpoint: Endpoint, outcome: RequestOutcome) {
        self.requests_total
            .with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .inc();
    }

    /// Record a single model attempt
    pub fn record_attempt(&self, role: ModelRole, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.model_attempts
            .with_label_values(&[role.as_str(), outcome])
            .inc();
    }

    /// Record a fallback to the secondary model
    pub fn record_fallback(&self) {
        self.model_fallbacks.inc();
    }

    /// Record a failed interaction log write
    pub fn record_log_failure(&self) {
        self.interaction_log_failures.inc();
    }

    /// Requests recorded for an endpoint/outcome pair
    pub fn request_count(&self, endpoint: Endpoint, outcome: RequestOutcome) -> u64 {
        self.requests_total
            .with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .get()
    }

    /// Attempts recorded for a role/outcome pair
    pub fn attempt_count(&self, role: ModelRole, success: bool) -> u64 {
        let outcome = if success { "success" } else { "failure" };
        self.model_attempts
            .with_label_values(&[role.as_str(), outcome])
            .get()
    }

    /// Fallbacks recorded so far
    pub fn fallback_count(&self) -> u64 {
        self.model_fallbacks.get()
    }

    /// Failed interaction log writes so far
    pub fn log_failure_count(&self) -> u64 {
        self.interaction_log_failures.get()
    }

    /// Gather all metrics in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the output is not valid UTF-8.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
