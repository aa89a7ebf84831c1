//! Login, registration and account administration.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{AuthSession, LoginRequest, RegisterRequest, User};
use crate::types::{AuthToken, UserId, UserRole};

#[derive(Serialize)]
struct RoleChange {
    role: UserRole,
}

impl ApiClient {
    /// `POST /api/auth/login`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 401 or 400 on bad credentials.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        let req = self
            .request(Method::POST, "api/auth/login", &[], None)?
            .json(request);
        Self::send_json(req, "login").await
    }

    /// `POST /api/auth/register`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the backend rejects the account,
    /// e.g. a taken username.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        let req = self
            .request(Method::POST, "api/auth/register", &[], None)?
            .json(request);
        Self::send_json(req, "register").await
    }

    /// `GET /api/auth/me`
    ///
    /// # Errors
    ///
    /// Returns a 401 [`ApiError::Status`] when the token has expired.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &AuthToken) -> Result<User, ApiError> {
        let req = self.request(Method::GET, "api/auth/me", &[], Some(token))?;
        Self::send_json(req, "me").await
    }

    /// `GET /api/auth/users` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn users(&self, token: &AuthToken) -> Result<Vec<User>, ApiError> {
        let req = self.request(Method::GET, "api/auth/users", &[], Some(token))?;
        Self::send_json(req, "users").await
    }

    /// `PUT /api/auth/users/{id}/role` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn set_user_role(
        &self,
        token: &AuthToken,
        id: UserId,
        role: UserRole,
    ) -> Result<(), ApiError> {
        let req = self
            .request(
                Method::PUT,
                &format!("api/auth/users/{id}/role"),
                &[],
                Some(token),
            )?
            .json(&RoleChange { role });
        Self::send_empty(req).await
    }

    /// `DELETE /api/auth/users/{id}` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_user(&self, token: &AuthToken, id: UserId) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("api/auth/users/{id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }
}
