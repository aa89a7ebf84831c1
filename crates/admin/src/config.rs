//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin console
//! - `SNACKSHOP_API_URL` - Base URL of the backend REST service
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_DASHBOARD_DAYS` - Days in the revenue chart (default: 7, max 90)
//! - `SNACKSHOP_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Longest revenue window the dashboard will ask for.
pub const MAX_DASHBOARD_DAYS: u32 = 90;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin console
    pub base_url: String,
    /// Backend REST service base URL
    pub api_url: String,
    /// Backend request timeout
    pub api_timeout: Duration,
    /// Days shown in the dashboard revenue chart
    pub dashboard_days: u32,
    /// Emit JSON logs
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
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

        let api_url = get_required_env("SNACKSHOP_API_URL")?;
        url::Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SNACKSHOP_API_URL".to_string(), e.to_string())
        })?;

        let dashboard_days: u32 = parse_env("ADMIN_DASHBOARD_DAYS", "7")?;
        if !(1..=MAX_DASHBOARD_DAYS).contains(&dashboard_days) {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_DASHBOARD_DAYS".to_string(),
                format!("must be between 1 and {MAX_DASHBOARD_DAYS}"),
            ));
        }

        Ok(Self {
            host: parse_env("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env("ADMIN_PORT", "3001")?,
            base_url: get_required_env("ADMIN_BASE_URL")?,
            api_url,
            api_timeout: Duration::from_secs(parse_env("SNACKSHOP_API_TIMEOUT_SECS", "10")?),
            dashboard_days,
            json_logs: get_env_or_default("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration for a console talking to `api_url` with defaults.
    #[must_use]
    pub fn local(api_url: impl Into<String>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            api_url: api_url.into(),
            api_timeout: Duration::from_secs(10),
            dashboard_days: 7,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_defaults() {
        let config = AdminConfig::local("http://backend.test");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.dashboard_days, 7);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_parse_env_reports_key() {
        let err = parse_env::<u32>("SNACKSHOP_ADMIN_TEST_UNSET", "seven");
        assert!(
            matches!(err, Err(ConfigError::InvalidEnvVar(key, _)) if key == "SNACKSHOP_ADMIN_TEST_UNSET")
        );
    }
}
