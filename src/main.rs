//! Studydoc HTTP server
//!
//! Starts an Axum web server exposing the study assistant API.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use studydoc::{
    auth,
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    provider::GeminiClient,
    storage::SqliteInteractionLog,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration, letting the environment supply secrets
    let load_config = || Config::load(&cli.config, |name| std::env::var(name).ok());

    match cli.command {
        Some(Command::Config { output }) => {
            let template = generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    eprintln!("Wrote configuration template to {}", path);
                }
                None => print!("{}", template),
            }
            return Ok(());
        }
        Some(Command::Token {
            user_id,
            ttl_seconds,
        }) => {
            let config = load_config()?;
            let ttl = ttl_seconds.unwrap_or(config.auth.token_ttl_seconds);
            println!("{}", auth::issue_token(&config.auth.jwt_secret, user_id, ttl)?);
            return Ok(());
        }
        None => {}
    }

    let config = load_config()?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting studydoc server on {}:{}",
        config.server.host,
        config.server.port
    );

    if config.provider.api_key().is_none() {
        tracing::warn!(
            variable = %config.provider.api_key_env,
            "No provider API key configured; AI endpoints will return guidance text"
        );
    }

    let http = reqwest::Client::builder().build()?;
    let provider = GeminiClient::new(http, config.provider.base_url.clone());
    let interaction_log = SqliteInteractionLog::connect(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await?;

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(
        Arc::new(config),
        Arc::new(provider),
        Arc::new(interaction_log),
    )?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check available at http://{}/health", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
