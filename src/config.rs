//! Configuration management for studydoc
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Secrets can be supplied through the environment; overrides are applied
//! once at startup and the resulting value is handed to every handler.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Key value shipped in the sample `.env` file; treated as "not configured"
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Upper bound for any timeout in seconds
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Generative-language provider configuration
///
/// `primary_model` is always tried first; `secondary_model` gets exactly one
/// attempt when the primary fails.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    #[serde(default = "default_secondary_model")]
    pub secondary_model: String,
    /// Deadline for each individual model attempt
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_seconds: u64,
    /// Name of the environment variable that overrides `api_key`
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default, skip_serializing)]
    api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            primary_model: default_primary_model(),
            secondary_model: default_secondary_model(),
            attempt_timeout_seconds: default_attempt_timeout(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    /// Get the configured API key, if any
    ///
    /// Blank keys and the placeholder sentinel count as unconfigured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Replace the API key
    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key;
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_primary_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_secondary_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_attempt_timeout() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Bearer token configuration
///
/// `jwt_secret` may be left out of the file and supplied via `JWT_SECRET`;
/// validation runs after environment overrides are applied.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

fn default_token_ttl() -> u64 {
    3600
}

/// Interaction log storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "studydoc.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::load(path, |_| None)
    }

    /// Load configuration from a TOML file, applying environment overrides
    /// before validation
    pub fn load<P, F>(path: P, lookup: F) -> AppResult<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let mut config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        // Phase 3: Environment overrides, then validation with file context
        config.apply_overrides(lookup);
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Apply environment overrides for secrets
    ///
    /// `lookup` is usually `|name| std::env::var(name).ok()`; tests pass a
    /// closure over a map so no process-wide state is touched.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply_overrides(lookup);
        self.validate()
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(&self.provider.api_key_env) {
            tracing::debug!(
                variable = %self.provider.api_key_env,
                "Provider API key taken from environment"
            );
            self.provider.set_api_key(Some(key));
        }

        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()` and `from_str()`, but can also
    /// be called explicitly when constructing Config via other means.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;

        for (field, model) in [
            ("primary_model", &provider.primary_model),
            ("secondary_model", &provider.secondary_model),
        ] {
            if model.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "provider.{} cannot be empty",
                    field
                )));
            }
            if model.contains('/') || model.contains(char::is_whitespace) {
                return Err(AppError::Config(format!(
                    "provider.{} '{}' must be a bare model identifier (no '/' or whitespace)",
                    field, model
                )));
            }
        }

        if provider.primary_model == provider.secondary_model {
            return Err(AppError::Config(format!(
                "provider.primary_model and provider.secondary_model are both '{}'. \
                The fallback attempt must target a different model.",
                provider.primary_model
            )));
        }

        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "provider.base_url '{}' must start with 'http://' or 'https://'",
                provider.base_url
            )));
        }

        if provider.attempt_timeout_seconds == 0 {
            return Err(AppError::Config(
                "provider.attempt_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if provider.attempt_timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "provider.attempt_timeout_seconds cannot exceed {} seconds, got {}",
                MAX_TIMEOUT_SECONDS, provider.attempt_timeout_seconds
            )));
        }

        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::Config(
                "auth.jwt_secret cannot be empty (set it in the config file or via JWT_SECRET)"
                    .to_string(),
            ));
        }
        if self.auth.token_ttl_seconds == 0 {
            return Err(AppError::Config(
                "auth.token_ttl_seconds must be greater than 0".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(AppError::Config(
                "storage.max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
