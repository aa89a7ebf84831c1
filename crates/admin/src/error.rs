//! Unified error handling for admin.
//!
//! A backend 401 sends the operator back to the login page and tags the
//! response with [`SessionExpired`] so the stored token is dropped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use snackshop_core::Toast;
use snackshop_core::api::{ApiError, ErrorKind};
use thiserror::Error;

/// Response extension marking a rejected backend token.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Api(e) = &self
            && e.is_unauthorized()
        {
            tracing::info!("Backend rejected admin token, sending to login");
            let mut response = Redirect::to("/auth/login").into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        // Log server errors with Sentry
        let server_error = match &self {
            Self::Api(e) => matches!(e.kind(), ErrorKind::Server | ErrorKind::Transport),
            Self::Session(_) => true,
        };
        if server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
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
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(e) => Toast::from_api_error(e).message,
            Self::Session(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in operator.
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
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
