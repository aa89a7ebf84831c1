//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # List accounts
//! snackshop users list
//!
//! # Grant or revoke admin console access
//! snackshop users set-role ann admin
//! snackshop users set-role 42 customer
//! ```

use snackshop_core::UserRole;
use snackshop_core::models::User;
use tracing::info;

use super::{CliError, admin_token, client};

/// Find a user by numeric id or username.
#[must_use]
pub fn find<'a>(users: &'a [User], needle: &str) -> Option<&'a User> {
    let needle = needle.trim();
    needle
        .parse::<i64>()
        .ok()
        .and_then(|id| users.iter().find(|u| u.id.as_i64() == id))
        .or_else(|| {
            users
                .iter()
                .find(|u| u.username.eq_ignore_ascii_case(needle))
        })
}

/// Log every account with its role.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn list() -> Result<(), CliError> {
    let api = client()?;
    let token = admin_token()?;
    let users = api.users(&token).await?;

    info!("{} users", users.len());
    for user in &users {
        info!(
            "  {:>6}  {:<24} {:<8} {}",
            user.id,
            user.username,
            user.role,
            user.email.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Change the role of the user named or numbered `who`.
///
/// # Errors
///
/// Returns an error if the role is not recognised, no user matches, or the
/// backend call fails.
pub async fn set_role(who: &str, role: UserRole) -> Result<(), CliError> {
    let api = client()?;
    let token = admin_token()?;
    let users = api.users(&token).await?;
    let user = find(&users, who).ok_or_else(|| CliError::UnknownUser(who.to_string()))?;

    if user.role == role {
        info!(user = %user.username, %role, "Role unchanged");
        return Ok(());
    }

    api.set_user_role(&token, user.id, role).await?;
    info!(user = %user.username, from = %user.role, to = %role, "Role changed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn users() -> Vec<User> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "username": "root", "role": "ADMIN"},
            {"id": 42, "username": "Ann"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_find_by_id_or_username() {
        let users = users();
        assert_eq!(find(&users, "42").map(|u| u.username.as_str()), Some("Ann"));
        assert_eq!(find(&users, "ann").map(|u| u.id.as_i64()), Some(42));
        assert!(find(&users, "bob").is_none());
    }
}
