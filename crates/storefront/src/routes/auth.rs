//! Authentication route handlers.
//!
//! Login and registration go through the backend's auth endpoints; the
//! returned bearer token is kept in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::api::{ApiError, ErrorKind};
use snackshop_core::models::{LoginRequest, RegisterRequest};
use snackshop_core::{Toast, Validate, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::middleware::{clear_current_user, set_current_user, take_return_to};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Shown when the backend rejects a login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        Self {
            username: form.username.trim().to_string(),
            password: form.password,
        }
    }
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub email: String,
    pub phone: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl From<RegisterForm> for RegisterRequest {
    fn from(form: RegisterForm) -> Self {
        Self {
            username: form.username.trim().to_string(),
            password: form.password,
            password_confirm: form.password_confirm,
            email: non_blank(&form.email),
            phone: non_blank(&form.phone),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub username: String,
    pub error: Option<String>,
    pub errors: ValidationErrors,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub error: Option<String>,
    pub errors: ValidationErrors,
}

/// Message for a failed login or registration call.
///
/// A 401 here means bad credentials, not an expired session, so it never
/// goes through the expiry redirect.
fn auth_failure(error: &ApiError) -> String {
    match error.kind() {
        ErrorKind::Unauthorized => INVALID_CREDENTIALS.to_string(),
        _ => Toast::from_api_error(error).message,
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(layout: Layout) -> impl IntoResponse {
    LoginTemplate {
        layout,
        username: String::new(),
        error: None,
        errors: ValidationErrors::new(),
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let request = LoginRequest::from(form);
    let rejected = |layout, error, errors| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
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

    match state.api().login(&request).await {
        Ok(auth) => {
            let user = CurrentUser::from_session(auth);
            let destination = take_return_to(&session).await;
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, &user.username);
            tracing::info!(user_id = %user.id, "Signed in");
            flash::push(&session, Toast::success(format!("Welcome back, {}", user.username)))
                .await?;
            Ok(Redirect::to(&destination).into_response())
        }
        Err(e) => {
            tracing::info!(error = %e, "Login rejected");
            Ok(rejected(layout, Some(auth_failure(&e)), ValidationErrors::new()))
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(layout: Layout) -> impl IntoResponse {
    RegisterTemplate {
        layout,
        username: String::new(),
        email: String::new(),
        phone: String::new(),
        error: None,
        errors: ValidationErrors::new(),
    }
}

/// Handle registration form submission.
///
/// The backend answers a successful registration with a token, so the new
/// shopper is signed in straight away.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let request = RegisterRequest::from(form);
    let rejected = |layout, error, errors| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterTemplate {
                layout,
                username: request.username.clone(),
                email: request.email.clone().unwrap_or_default(),
                phone: request.phone.clone().unwrap_or_default(),
                error,
                errors,
            },
        )
            .into_response()
    };

    if let Err(errors) = request.validate() {
        return Ok(rejected(layout, None, errors));
    }

    match state.api().register(&request).await {
        Ok(auth) => {
            let user = CurrentUser::from_session(auth);
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, &user.username);
            tracing::info!(user_id = %user.id, "Registered");
            flash::push(&session, Toast::success("Welcome to Snackshop!")).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            Ok(rejected(layout, Some(auth_failure(&e)), ValidationErrors::new()))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out. The cart stays with the browser session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    flash::push(&session, Toast::info("You have been signed out")).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_drops_blank_optionals() {
        let request = RegisterRequest::from(RegisterForm {
            username: " ann ".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
            email: "  ".to_string(),
            phone: "5550100".to_string(),
        });
        assert_eq!(request.username, "ann");
        assert_eq!(request.email, None);
        assert_eq!(request.phone.as_deref(), Some("5550100"));
    }

    #[test]
    fn test_bad_credentials_message() {
        let unauthorized = ApiError::Status {
            status: 401,
            message: Some("Bad credentials".to_string()),
        };
        assert_eq!(auth_failure(&unauthorized), INVALID_CREDENTIALS);

        let taken = ApiError::Status {
            status: 400,
            message: Some("Username already exists".to_string()),
        };
        assert_eq!(auth_failure(&taken), "Username already exists");
    }
}
