//! User management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use snackshop_core::models::User;
use snackshop_core::{Toast, UserId, UserRole};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::AdminLayout;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Shown when an admin tries to demote or delete their own account.
pub const SELF_CHANGE_REFUSED: &str = "You cannot change or delete your own account here";

/// User row for templates.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub is_admin: bool,
    pub is_self: bool,
    pub joined: String,
}

impl UserRowView {
    fn new(user: &User, current: UserId) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            role: user.role.to_string(),
            is_admin: user.is_admin(),
            is_self: user.id == current,
            joined: user
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub layout: AdminLayout,
    pub users: Vec<UserRowView>,
}

/// Users list handler.
///
/// GET /users
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: AdminLayout,
) -> Result<impl IntoResponse> {
    let users = state.api().users(&admin.token).await?;
    Ok(UsersTemplate {
        layout,
        users: users.iter().map(|u| UserRowView::new(u, admin.id)).collect(),
    })
}

/// Requested role.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: UserRole,
}

/// Change a user's role.
///
/// POST /users/{id}/role
#[instrument(skip_all, fields(admin_id = %admin.id, user_id = %id, role = %form.role))]
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<UserId>,
    Form(form): Form<RoleForm>,
) -> Result<Redirect> {
    if id == admin.id {
        flash::push(&session, Toast::warning(SELF_CHANGE_REFUSED)).await?;
        return Ok(Redirect::to("/users"));
    }

    let result = state.api().set_user_role(&admin.token, id, form.role).await;
    let message = format!("Role changed to {}", form.role);
    flash::outcome(&session, result, &message).await?;
    Ok(Redirect::to("/users"))
}

/// Delete a user.
///
/// POST /users/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<Redirect> {
    if id == admin.id {
        flash::push(&session, Toast::warning(SELF_CHANGE_REFUSED)).await?;
        return Ok(Redirect::to("/users"));
    }

    let result = state.api().delete_user(&admin.token, id).await;
    flash::outcome(&session, result, "User deleted").await?;
    Ok(Redirect::to("/users"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_marks_current_admin() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 7,
            "username": "root",
            "role": "ADMIN",
            "createdAt": "2024-05-01T10:00:00"
        }))
        .unwrap();
        let row = UserRowView::new(&user, UserId::new(7));
        assert!(row.is_self);
        assert!(row.is_admin);
        assert_eq!(row.role, "admin");
        assert_eq!(row.joined, "2024-05-01");
    }

    #[test]
    fn test_role_form_uses_wire_names() {
        let form: RoleForm =
            serde_json::from_value(serde_json::json!({"role": "ADMIN"})).unwrap();
        assert_eq!(form.role, UserRole::Admin);
    }
}
