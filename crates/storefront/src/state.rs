//! Application state shared across handlers.

use std::sync::Arc;

use snackshop_core::api::{ApiClient, ApiError};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built from the
    /// configured URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_url, config.api_timeout)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
