//! Toasts queued in the session and shown once by the next rendered page.

use snackshop_core::Toast;
use snackshop_core::api::ApiError;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Queue a toast for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(session: &Session, toast: Toast) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Toast> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    queued.push(toast);
    session.insert(session_keys::FLASH, queued).await
}

/// Take every queued toast, leaving the queue empty.
///
/// A broken session yields no toasts rather than failing the page.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(session_keys::FLASH).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash toasts");
            Vec::new()
        }
    }
}

/// Turn the result of a backend mutation into a toast.
///
/// On success queues `success` and returns the value. On failure queues the
/// toast for the error and returns `None`, except that a rejected token is
/// returned as an error so the response can send the user to login.
///
/// # Errors
///
/// Returns [`AppError::Api`] for a 401 and [`AppError::Session`] if the
/// toast cannot be queued.
pub async fn outcome<T>(
    session: &Session,
    result: Result<T, ApiError>,
    success: &str,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => {
            push(session, Toast::success(success)).await?;
            Ok(Some(value))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            push(session, Toast::from_api_error(&e)).await?;
            Ok(None)
        }
    }
}
