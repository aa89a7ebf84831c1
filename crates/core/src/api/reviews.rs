use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{NewReview, Review};
use crate::types::{AuthToken, ProductId};

impl ApiClient {
    /// `GET /api/reviews/product/{productId}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn product_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, ApiError> {
        let req = self.request(
            Method::GET,
            &format!("api/reviews/product/{product_id}"),
            &[],
            None,
        )?;
        Self::send_json(req, "product reviews").await
    }

    /// `POST /api/reviews`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, e.g. the line was already
    /// reviewed.
    #[instrument(skip(self, token, review), fields(product_id = %review.product_id))]
    pub async fn post_review(&self, token: &AuthToken, review: &NewReview) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, "api/reviews", &[], Some(token))?
            .json(review);
        Self::send_empty(req).await
    }
}
