//! Products and categories.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{Category, CategoryInput, Page, Product, ProductInput, ProductQuery};
use crate::types::{AuthToken, CategoryId, ProductId, ProductStatus};

#[derive(Serialize)]
struct StatusChange {
    status: ProductStatus,
}

impl ApiClient {
    /// `GET /api/products?keyword&categoryId&page&size`
    ///
    /// The admin console passes its token so off-sale products are listed too.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn products(
        &self,
        query: &ProductQuery,
        token: Option<&AuthToken>,
    ) -> Result<Page<Product>, ApiError> {
        let req = self.request(Method::GET, "api/products", &query.to_params(), token)?;
        Self::send_json(req, "products").await
    }

    /// `GET /api/products/{id}`
    ///
    /// # Errors
    ///
    /// Returns a 404 [`ApiError::Status`] for unknown ids.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let req = self.request(Method::GET, &format!("api/products/{id}"), &[], None)?;
        Self::send_json(req, "product").await
    }

    /// `POST /api/products` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &AuthToken,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let req = self
            .request(Method::POST, "api/products", &[], Some(token))?
            .json(input);
        Self::send_json(req, "create product").await
    }

    /// `PUT /api/products/{id}` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, input))]
    pub async fn update_product(
        &self,
        token: &AuthToken,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("api/products/{id}"), &[], Some(token))?
            .json(input);
        Self::send_empty(req).await
    }

    /// `PUT /api/products/{id}/status` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn set_product_status(
        &self,
        token: &AuthToken,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<(), ApiError> {
        let req = self
            .request(
                Method::PUT,
                &format!("api/products/{id}/status"),
                &[],
                Some(token),
            )?
            .json(&StatusChange { status });
        Self::send_empty(req).await
    }

    /// `DELETE /api/products/{id}` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, token: &AuthToken, id: ProductId) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("api/products/{id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `GET /api/categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let req = self.request(Method::GET, "api/categories", &[], None)?;
        Self::send_json(req, "categories").await
    }

    /// `POST /api/categories` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        token: &AuthToken,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let req = self
            .request(Method::POST, "api/categories", &[], Some(token))?
            .json(input);
        Self::send_json(req, "create category").await
    }

    /// `PUT /api/categories/{id}` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, input))]
    pub async fn update_category(
        &self,
        token: &AuthToken,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<(), ApiError> {
        let req = self
            .request(
                Method::PUT,
                &format!("api/categories/{id}"),
                &[],
                Some(token),
            )?
            .json(input);
        Self::send_empty(req).await
    }

    /// `DELETE /api/categories/{id}` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, e.g. the category still has
    /// products.
    #[instrument(skip(self, token))]
    pub async fn delete_category(&self, token: &AuthToken, id: CategoryId) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("api/categories/{id}"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }
}
