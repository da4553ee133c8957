//! Studydoc - AI study assistant API
//!
//! This library builds student prompts from module-tagged intents and answers them
//! through a Gemini model with a single primary → secondary fallback, degrading to
//! helpful text when the provider is unavailable.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod prompt;
pub mod provider;
pub mod storage;
pub mod telemetry;
