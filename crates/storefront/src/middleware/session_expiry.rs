//! Drops the stored token when the backend rejected it.
//!
//! Handlers turn a backend 401 into a redirect tagged with
//! [`SessionExpired`]; this middleware sees the tag on the way out, signs the
//! shopper out and queues a toast explaining why. Must run inside the
//! session layer.

use axum::{extract::Request, middleware::Next, response::Response};
use snackshop_core::{Toast, toast};
use tower_sessions::Session;

use crate::error::{SessionExpired, clear_sentry_user};
use crate::flash;
use crate::middleware::auth::clear_current_user;

pub async fn session_expiry_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.extensions().get::<SessionExpired>().is_some() {
        if let Err(e) = clear_current_user(&session).await {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        if let Err(e) = flash::push(&session, Toast::warning(toast::SESSION_EXPIRED)).await {
            tracing::warn!(error = %e, "Failed to queue session expiry toast");
        }
        clear_sentry_user();
    }

    response
}
