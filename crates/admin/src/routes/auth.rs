//! Authentication route handlers for admin.
//!
//! Operators sign in with their backend account; only accounts whose role is
//! `Admin` get a console session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::api::ErrorKind;
use snackshop_core::models::LoginRequest;
use snackshop_core::{Toast, Validate, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::flash;
use crate::layout::AdminLayout;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Shown when the backend rejects the credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Shown when a customer account tries to sign in.
pub const NOT_AN_ADMIN: &str = "This account cannot use the admin console";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub layout: AdminLayout,
    pub username: String,
    pub error: Option<String>,
    pub errors: ValidationErrors,
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Render the login page.
///
/// GET /auth/login
pub async fn login_page(layout: AdminLayout) -> impl IntoResponse {
    LoginPageTemplate {
        layout,
        username: String::new(),
        error: None,
        errors: ValidationErrors::new(),
    }
}

/// Sign in.
///
/// POST /auth/login
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: AdminLayout,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let request = LoginRequest {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    let rejected = |layout, error, errors| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginPageTemplate {
                layout,
                username: request.username.clone(),
                error,
                errors,
            },
        )
            .into_response()
    };

    if let Err(errors) = request.validate() {
        return Ok(rejected(layout, None, errors));
    }

    let auth = match state.api().login(&request).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::info!(error = %e, "Admin login rejected");
            let message = match e.kind() {
                ErrorKind::Unauthorized => INVALID_CREDENTIALS.to_string(),
                _ => Toast::from_api_error(&e).message,
            };
            return Ok(rejected(layout, Some(message), ValidationErrors::new()));
        }
    };

    let admin = CurrentAdmin::from_session(auth);
    if !admin.is_admin() {
        tracing::warn!(user_id = %admin.id, "Non-admin account tried to sign in");
        return Ok((
            StatusCode::FORBIDDEN,
            LoginPageTemplate {
                layout,
                username: request.username.clone(),
                error: Some(NOT_AN_ADMIN.to_string()),
                errors: ValidationErrors::new(),
            },
        )
            .into_response());
    }

    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, &admin.username);
    tracing::info!(user_id = %admin.id, "Admin signed in");
    Ok(Redirect::to("/").into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    flash::push(&session, Toast::info("Signed out")).await?;
    Ok(Redirect::to("/auth/login"))
}
