//! Structured logging setup
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at the configured
//! `[observability] log_level` and HTTP tracing from tower-http at debug.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter directives used when `RUST_LOG` is unset
pub fn default_directives(level: &str) -> String {
    format!("studydoc={},tower_http=debug", level.trim().to_lowercase())
}

/// Install the global tracing subscriber
///
/// Only the first call has an effect.
///
/// ```no_run
/// studydoc::telemetry::init("info");
/// tracing::info!("Application started");
/// ```
pub fn init(level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    });
}
