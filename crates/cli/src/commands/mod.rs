//! CLI command implementations.
//!
//! # Environment Variables
//!
//! - `SNACKSHOP_API_URL` - Base URL of the backend REST service
//! - `SNACKSHOP_ADMIN_TOKEN` - Bearer token of an admin account (seed, users)
//! - `SNACKSHOP_API_TIMEOUT_SECS` - Backend request timeout (default: 10)

pub mod health;
pub mod seed;
pub mod users;

use std::time::Duration;

use secrecy::SecretString;
use snackshop_core::AuthToken;
use snackshop_core::api::{ApiClient, ApiError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable could not be parsed.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid YAML for the catalog shape.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Seed file parsed but some entries fail validation.
    #[error("{0} invalid seed entries")]
    InvalidSeed(usize),

    /// No user matched the given id or username.
    #[error("No user named or numbered {0}")]
    UnknownUser(String),
}

/// Build a backend client from `SNACKSHOP_API_URL`.
///
/// # Errors
///
/// Returns an error if the URL is missing or unusable.
pub fn client() -> Result<ApiClient, CliError> {
    let url = std::env::var("SNACKSHOP_API_URL")
        .map_err(|_| CliError::MissingEnvVar("SNACKSHOP_API_URL"))?;
    let timeout = match std::env::var("SNACKSHOP_API_TIMEOUT_SECS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| CliError::InvalidEnvVar("SNACKSHOP_API_TIMEOUT_SECS", e.to_string()))?,
        Err(_) => 10,
    };
    Ok(ApiClient::new(&url, Duration::from_secs(timeout))?)
}

/// Admin bearer token from `SNACKSHOP_ADMIN_TOKEN`.
///
/// # Errors
///
/// Returns an error if the variable is missing or blank.
pub fn admin_token() -> Result<AuthToken, CliError> {
    std::env::var("SNACKSHOP_ADMIN_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
        .map(|t| AuthToken::from(SecretString::from(t)))
        .ok_or(CliError::MissingEnvVar("SNACKSHOP_ADMIN_TOKEN"))
}
