//! Accounts and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AuthToken, UserId, UserRole};

/// A shop account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Response of login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: AuthToken,
    pub user: User,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Payload for `POST /api/auth/register`.
///
/// `password_confirm` only exists on the form and never leaves the frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub password_confirm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
