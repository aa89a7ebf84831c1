//! Application state shared across handlers.

use std::sync::Arc;

use snackshop_core::api::{ApiClient, ApiError};

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable; holds the configuration and the backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built from the
    /// configured URL.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_url, config.api_timeout)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
