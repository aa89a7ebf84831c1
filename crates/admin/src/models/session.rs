//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use snackshop_core::models::AuthSession;
use snackshop_core::{AuthToken, UserId, UserRole};

/// Session-stored operator identity.
///
/// Only accounts whose backend role is `Admin` are stored here, but the role
/// is kept so the extractor can re-check it on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Backend user id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Backend role at login time.
    pub role: UserRole,
    /// Bearer token for backend calls.
    pub token: AuthToken,
}

impl CurrentAdmin {
    /// Build from a backend login response.
    #[must_use]
    pub fn from_session(auth: AuthSession) -> Self {
        Self {
            id: auth.user.id,
            username: auth.user.username,
            role: auth.user.role,
            token: auth.token,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for queued toasts.
    pub const FLASH: &str = "flash";
}
