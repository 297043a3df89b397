//! Configuration management for the server.

use std::env;
use std::time::Duration;

use campus_engine::DEFAULT_PAGE_SIZE;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Base URL of the school REST API (e.g. `http://localhost:8000/`)
    pub upstream_url: String,
    /// Service token used when the caller does not send one
    pub upstream_token: Option<String>,
    /// Items per page for new screens and unparameterized listings
    pub default_page_size: usize,
    /// Timeout for each upstream request
    pub upstream_timeout: Duration,
    /// Reject requests without a bearer token
    pub auth_required: bool,
    /// Screens untouched for this long are discarded
    pub screen_idle: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let upstream_url = var("UPSTREAM_API_URL").ok_or(ConfigError::MissingUpstreamUrl)?;

        let upstream_token = var("UPSTREAM_TOKEN").filter(|token| !token.is_empty());

        let default_page_size = match var("DEFAULT_PAGE_SIZE") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|size: &usize| *size >= 1)
                .ok_or(ConfigError::InvalidPageSize)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let upstream_timeout = var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let auth_required = var("AUTH_REQUIRED")
            .map(|raw| matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let screen_idle = var("SCREEN_IDLE_SECS")
            .unwrap_or_else(|| "1800".to_string())
            .parse()
            .ok()
            .filter(|secs: &u64| *secs >= 1)
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidScreenIdle)?;

        Ok(Self {
            host,
            port,
            upstream_url,
            upstream_token,
            default_page_size,
            upstream_timeout,
            auth_required,
            screen_idle,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("UPSTREAM_API_URL environment variable is required")]
    MissingUpstreamUrl,

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("DEFAULT_PAGE_SIZE must be a positive integer")]
    InvalidPageSize,

    #[error("Invalid UPSTREAM_TIMEOUT_SECS value")]
    InvalidTimeout,

    #[error("SCREEN_IDLE_SECS must be a positive integer")]
    InvalidScreenIdle,
}
