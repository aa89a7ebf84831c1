//! Authentication middleware and extractors for admin.
//!
//! Provides the extractor that guards every console page.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires a signed-in administrator.
///
/// Nobody signed in redirects to the login page; a session whose role is
/// not `Admin` is refused with 403.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when the request is not from an administrator.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Signed in without the admin role.
    Forbidden,
    /// Session layer missing.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                snackshop_core::toast::FORBIDDEN,
            )
                .into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        if !admin.is_admin() {
            tracing::warn!(user_id = %admin.id, "Non-admin session refused");
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// Store the signed-in admin in the session, cycling the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Remove the signed-in admin and their token.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}
