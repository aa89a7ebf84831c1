//! Data every full page needs: signed-in user, cart badge, queued toasts
//! and the CSP nonce.

use axum::{extract::FromRequestParts, http::request::Parts};
use snackshop_core::Toast;
use tower_sessions::Session;

use crate::cart::cart_store;
use crate::flash;
use crate::middleware::CspNonce;
use crate::models::{CurrentUser, session_keys};

/// Page chrome passed to every full-page template as `layout`.
///
/// Extracting it consumes the queued toasts, so only handlers that render a
/// page should take it.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<CurrentUser>,
    pub cart_count: u32,
    pub toasts: Vec<Toast>,
    pub nonce: String,
}

impl Layout {
    /// Name shown in the header, if signed in.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

impl<S> FromRequestParts<S> for Layout
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self {
                nonce,
                ..Self::default()
            });
        };

        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let cart_count = match cart_store(&session).load().await {
            Ok(cart) => cart.item_count(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart for badge");
                0
            }
        };
        let toasts = flash::take(&session).await;

        Ok(Self {
            user,
            cart_count,
            toasts,
            nonce,
        })
    }
}
