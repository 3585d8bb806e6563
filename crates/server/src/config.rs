//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ANTHROPIC_API_KEY` - Anthropic API key (must start with `sk-ant-`)
//!
//! ## Optional
//! - `LEEKSPIN_HOST` - Bind address (default: 127.0.0.1)
//! - `LEEKSPIN_PORT` - Listen port (default: 3000)
//! - `ANTHROPIC_MODEL` - Model id (default: claude-3-5-haiku-20241022)
//! - `ANTHROPIC_MAX_TOKENS` - Max tokens per response (default: 2048)
//! - `ANTHROPIC_TIMEOUT_SECS` - Upstream request timeout (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const API_KEY_PREFIX: &str = "sk-ant-";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Claude API configuration
    pub claude: ClaudeConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: String,
}

/// Claude API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model id (e.g., claude-3-5-haiku-20241022)
    pub model: String,
    /// Maximum tokens per response
    pub max_tokens: u32,
    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LEEKSPIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LEEKSPIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LEEKSPIN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LEEKSPIN_PORT".to_string(), e.to_string()))?;

        let claude = ClaudeConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_env_or_default("SENTRY_ENVIRONMENT", "development");

        Ok(Self {
            host,
            port,
            claude,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ClaudeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_api_key("ANTHROPIC_API_KEY")?;
        let model = get_env_or_default("ANTHROPIC_MODEL", "claude-3-5-haiku-20241022");
        let max_tokens = get_env_or_default("ANTHROPIC_MAX_TOKENS", "2048")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ANTHROPIC_MAX_TOKENS".to_string(), e.to_string())
            })?;
        let request_timeout_secs = get_env_or_default("ANTHROPIC_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ANTHROPIC_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_key,
            model,
            max_tokens,
            request_timeout_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load the Anthropic API key and validate its shape.
///
/// A wrong-shaped key would only surface as a 401 on the first upstream
/// call, so catch the obvious mistakes at startup instead.
fn get_api_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_api_key(&value, key)?;
    Ok(SecretString::from(value))
}

fn validate_api_key(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if !value.starts_with(API_KEY_PREFIX) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must start with '{API_KEY_PREFIX}'"),
        ));
    }
    Ok(())
}
