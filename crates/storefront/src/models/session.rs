//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use snackshop_core::models::{AuthSession, User};
use snackshop_core::{AuthToken, UserId, UserRole};

/// Session-stored identity of the signed-in shopper.
///
/// Holds the backend bearer token; the session store is server-side so the
/// token never reaches the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
    pub token: AuthToken,
}

impl CurrentUser {
    /// Build from a backend login or registration response.
    #[must_use]
    pub fn from_session(auth: AuthSession) -> Self {
        let AuthSession { token, user } = auth;
        Self::new(user, token)
    }

    #[must_use]
    pub fn new(user: User, token: AuthToken) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            token,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user and token.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for queued toasts.
    pub const FLASH: &str = "flash";

    /// Key for the page to return to after login.
    pub const RETURN_TO: &str = "return_to";
}
