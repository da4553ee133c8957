//! Command-line interface for studydoc
//!
//! Provides argument parsing and subcommand handling for the studydoc binary.

use clap::{Parser, Subcommand};

/// AI study assistant API
#[derive(Parser)]
#[command(name = "studydoc")]
#[command(version)]
#[command(about = "AI study assistant API backed by Gemini")]
#[command(
    long_about = "Studydoc serves tutoring, exam practice, study planning and wellness chat \
    through a Gemini model, falling back to a secondary model once and degrading to helpful \
    text when the provider is unavailable."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Mint a bearer token for local testing
    Token {
        /// User id placed in the token
        #[arg(long)]
        user_id: i64,
        /// Lifetime in seconds (defaults to auth.token_ttl_seconds)
        #[arg(long)]
        ttl_seconds: Option<u64>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Studydoc Configuration
# ======================
#
# Secrets can be supplied through the environment instead of this file:
#   GEMINI_API_KEY  provider key (variable name set by provider.api_key_env)
#   JWT_SECRET      bearer token signing secret

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"
port = 5000

[provider]
base_url = "https://generativelanguage.googleapis.com/v1beta"

# Tried first on every request
primary_model = "gemini-1.5-flash"

# Tried exactly once if the primary fails
secondary_model = "gemini-1.5-pro"

# Deadline for each model attempt (1-300)
attempt_timeout_seconds = 30

# Environment variable holding the API key. Without a key the AI endpoints
# answer with guidance text instead of failing.
api_key_env = "GEMINI_API_KEY"
# api_key = "..."

[auth]
jwt_secret = "change-me"
token_ttl_seconds = 3600

[storage]
# SQLite file holding wellness chat logs
database_url = "studydoc.db"
max_connections = 5

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
