//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//!
//! # Example
//!
//! ```
//! use focus_check::config::Config;
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     base_url: "http://127.0.0.1:8000".to_string(),
//!     request_timeout_ms: 10_000,
//!     log_level: "info".to_string(),
//! };
//!
//! assert_eq!(config.request_timeout_ms, 10_000);
//! ```

use crate::error::ConfigError;

/// Default base URL of the inference service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Minimum allowed request timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// Maximum allowed request timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment
/// variables (a `.env` file is honored if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the inference service.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `DIAGNOSE_BASE_URL`: Inference service base URL (default: `http://127.0.0.1:8000`)
    /// - `REQUEST_TIMEOUT_MS`: Request timeout (default: `10000`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `REQUEST_TIMEOUT_MS` is not a valid positive integer
    /// - `REQUEST_TIMEOUT_MS` is outside `[MIN_TIMEOUT_MS, MAX_TIMEOUT_MS]`
    /// - `DIAGNOSE_BASE_URL` is empty or not an http(s) URL
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let base_url =
            std::env::var("DIAGNOSE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let request_timeout_ms = parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let config = Self {
            base_url,
            request_timeout_ms,
            log_level,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Validate a configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for out-of-bounds timeouts or a
/// malformed base URL.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.request_timeout_ms < MIN_TIMEOUT_MS || config.request_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"),
        });
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            var: "DIAGNOSE_BASE_URL".into(),
            reason: "must start with http:// or https://".into(),
        });
    }

    Ok(())
}

/// Parse an environment variable as u64, falling back to a default.
fn parse_env_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.into(),
            reason: format!("'{value}' is not a valid positive integer"),
        }),
        Err(_) => Ok(default),
    }
}
