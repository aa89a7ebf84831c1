//! Page chrome shared by every console template.

use axum::{extract::FromRequestParts, http::request::Parts};
use snackshop_core::Toast;
use tower_sessions::Session;

use crate::flash;
use crate::models::{CurrentAdmin, session_keys};

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub username: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            username: admin.username.clone(),
        }
    }
}

/// Passed to full-page templates as `layout`. Extracting it consumes the
/// queued toasts.
#[derive(Debug, Clone, Default)]
pub struct AdminLayout {
    pub admin_user: Option<AdminUserView>,
    /// Request path, used to highlight the active nav entry.
    pub current_path: String,
    pub toasts: Vec<Toast>,
}

impl AdminLayout {
    /// Whether the nav entry for `prefix` is the active one.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(prefix)
        }
    }
}

impl<S> FromRequestParts<S> for AdminLayout
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current_path = parts.uri.path().to_string();
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self {
                current_path,
                ..Self::default()
            });
        };

        let admin_user = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .map(|admin| AdminUserView::from(&admin));

        Ok(Self {
            admin_user,
            current_path,
            toasts: flash::take(&session).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_highlighting() {
        let layout = AdminLayout {
            current_path: "/products/4/edit".to_string(),
            ..AdminLayout::default()
        };
        assert!(layout.is_active("/products"));
        assert!(!layout.is_active("/"));
        assert!(!layout.is_active("/orders"));
    }
}
