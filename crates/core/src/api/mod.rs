//! Typed client for the Snackshop REST backend.
//!
//! Every page handler in the storefront and admin console goes through
//! [`ApiClient`]. The client is cheap to clone and shares one connection pool.
//! Authenticated calls take the caller's [`AuthToken`] and send it as
//! `Authorization: Bearer <token>`.
//!
//! Requests are not retried. A non-2xx response becomes
//! [`ApiError::Status`] carrying the `message` field of the JSON error body
//! when there is one.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use snackshop_core::api::ApiClient;
//! use snackshop_core::models::ProductQuery;
//!
//! let api = ApiClient::new("http://localhost:8080", Duration::from_secs(10))?;
//! let page = api.products(&ProductQuery::default()).await?;
//! ```

mod addresses;
mod auth;
mod catalog;
mod dashboard;
mod favorites;
mod orders;
mod reviews;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::types::AuthToken;

const USER_AGENT: &str = concat!("snackshop/", env!("CARGO_PKG_VERSION"));

/// Errors from backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The request never completed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL or a path could not form a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Coarse classification of an [`ApiError`], used to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Server,
    Client,
    Transport,
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { status: 401, .. } => ErrorKind::Unauthorized,
            Self::Status { status: 403, .. } => ErrorKind::Forbidden,
            Self::Status { status: 404, .. } => ErrorKind::NotFound,
            Self::Status { status, .. } if *status >= 500 => ErrorKind::Server,
            Self::Status { .. } => ErrorKind::Client,
            Self::Http(_) => ErrorKind::Transport,
            Self::Decode { .. } | Self::InvalidUrl(_) => ErrorKind::Server,
        }
    }

    /// HTTP status the backend returned, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller's token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build()?;

        // Keep exactly one trailing slash so joined paths extend the base.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { http, base_url }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, params)?;
        let mut request = self.inner.http.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        Ok(request)
    }

    /// Send and decode a JSON response.
    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            context: context.to_string(),
            source,
        })
    }

    /// Send and ignore the response body.
    async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(%status, "Backend rejected credentials");
        } else if status.is_server_error() {
            tracing::error!(%status, message = ?message, "Backend server error");
        } else {
            tracing::warn!(%status, message = ?message, "Backend request failed");
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://backend.test:8080/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_joins_paths_and_encodes_params() {
        let url = client()
            .url("/api/products", &[("keyword", "hot chips & dip".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://backend.test:8080/api/products?keyword=hot+chips+%26+dip"
        );
    }

    #[test]
    fn test_base_url_with_prefix_is_kept() {
        let api = ApiClient::new("http://backend.test/shop", Duration::from_secs(1)).unwrap();
        let url = api.url("api/health", &[]).unwrap();
        assert_eq!(url.as_str(), "http://backend.test/shop/api/health");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_kinds() {
        let status = |status| ApiError::Status {
            status,
            message: None,
        };
        assert_eq!(status(401).kind(), ErrorKind::Unauthorized);
        assert!(status(401).is_unauthorized());
        assert_eq!(status(403).kind(), ErrorKind::Forbidden);
        assert_eq!(status(404).kind(), ErrorKind::NotFound);
        assert_eq!(status(400).kind(), ErrorKind::Client);
        assert_eq!(status(503).kind(), ErrorKind::Server);
        assert_eq!(status(409).status(), Some(409));
    }
}
