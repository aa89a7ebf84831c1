//! Saved shipping addresses of the signed-in user.

use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{Address, AddressInput};
use crate::types::{AddressId, AuthToken};

impl ApiClient {
    /// `GET /api/auth/addresses`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn addresses(&self, token: &AuthToken) -> Result<Vec<Address>, ApiError> {
        let req = self.request(Method::GET, "api/auth/addresses", &[], Some(token))?;
        Self::send_json(req, "addresses").await
    }

    /// `POST /api/auth/addresses`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn create_address(
        &self,
        token: &AuthToken,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, "api/auth/addresses", &[], Some(token))?
            .json(input);
        Self::send_empty(req).await
    }

    /// `PUT /api/auth/addresses/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, input))]
    pub async fn update_address(
        &self,
        token: &AuthToken,
        id: AddressId,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        let req = self
            .request(
                Method::PUT,
                &format!("api/auth/addresses/{id}"),
                &[],
                Some(token),
            )?
            .json(input);
        Self::send_empty(req).await
    }

    /// `DELETE /api/auth/addresses/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_address(&self, token: &AuthToken, id: AddressId) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("api/auth/addresses/{id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `PUT /api/auth/addresses/{id}/default`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn set_default_address(
        &self,
        token: &AuthToken,
        id: AddressId,
    ) -> Result<(), ApiError> {
        let req = self.request(
            Method::PUT,
            &format!("api/auth/addresses/{id}/default"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }
}
