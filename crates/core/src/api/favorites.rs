use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::Favorite;
use crate::types::{AuthToken, ProductId};

/// The check endpoint answers with a bare boolean or `{"favorited": bool}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FavoriteCheck {
    Flag(bool),
    Object {
        favorited: bool,
    },
}

impl ApiClient {
    /// `GET /api/favorites`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn favorites(&self, token: &AuthToken) -> Result<Vec<Favorite>, ApiError> {
        let req = self.request(Method::GET, "api/favorites", &[], Some(token))?;
        Self::send_json(req, "favorites").await
    }

    /// `POST /api/favorites/{productId}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn add_favorite(&self, token: &AuthToken, product_id: ProductId) -> Result<(), ApiError> {
        let req = self.request(
            Method::POST,
            &format!("api/favorites/{product_id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `DELETE /api/favorites/{productId}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn remove_favorite(
        &self,
        token: &AuthToken,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("api/favorites/{product_id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `GET /api/favorites/check/{productId}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn is_favorite(&self, token: &AuthToken, product_id: ProductId) -> Result<bool, ApiError> {
        let req = self.request(
            Method::GET,
            &format!("api/favorites/check/{product_id}"),
            &[],
            Some(token),
        )?;
        let check: FavoriteCheck = Self::send_json(req, "favorite check").await?;
        Ok(match check {
            FavoriteCheck::Flag(favorited) | FavoriteCheck::Object { favorited } => favorited,
        })
    }
}
