//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! A backend 401 is not an error page: the response redirects to the login
//! page and carries a [`SessionExpired`] marker so the session expiry
//! middleware drops the stored token.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use snackshop_core::api::{ApiError, ErrorKind};
use snackshop_core::{CartError, StorageError, Toast};
use thiserror::Error;

/// Response extension marking a rejected backend token.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Cart update was refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Cart storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Api(e) => matches!(e.kind(), ErrorKind::Server | ErrorKind::Transport),
            Self::Cart(CartError::Storage(_)) | Self::Storage(_) | Self::Session(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Api(e) = &self
            && e.is_unauthorized()
        {
            tracing::info!("Backend rejected session token, sending to login");
            let mut response = Redirect::to("/auth/login").into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(e) => match e.kind() {
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Client => StatusCode::BAD_REQUEST,
                ErrorKind::Server | ErrorKind::Transport => StatusCode::BAD_GATEWAY,
            },
            Self::Cart(CartError::Storage(_)) | Self::Storage(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Cart(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(e) => Toast::from_api_error(e).message,
            Self::Cart(CartError::Storage(_)) | Self::Storage(_) | Self::Session(_) => {
                "Internal server error".to_string()
            }
            Self::Cart(e) => e.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    fn api(status: u16) -> AppError {
        AppError::Api(ApiError::Status {
            status,
            message: Some("boom".to_string()),
        })
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Cart(CartError::InsufficientStock { available: 3 });
        assert_eq!(err.to_string(), "Cart error: only 3 left in stock");
    }

    #[test]
    fn test_backend_status_mapping() {
        assert_eq!(status(api(403)), StatusCode::FORBIDDEN);
        assert_eq!(status(api(404)), StatusCode::NOT_FOUND);
        assert_eq!(status(api(400)), StatusCode::BAD_REQUEST);
        assert_eq!(status(api(500)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Storage(StorageError::Backend("down".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_redirects_and_marks_response() {
        let response = api(401).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
        assert!(response.extensions().get::<SessionExpired>().is_some());
    }
}
