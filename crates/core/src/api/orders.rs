//! Order placement, tracking and administration.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{Order, Page, PlaceOrder};
use crate::types::{AuthToken, OrderId, OrderStatus};

#[derive(Serialize)]
struct StatusChange {
    status: OrderStatus,
}

impl ApiClient {
    /// `POST /api/orders`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, e.g. a line is out of stock.
    #[instrument(skip(self, token, order), fields(lines = order.items.len()))]
    pub async fn place_order(&self, token: &AuthToken, order: &PlaceOrder) -> Result<Order, ApiError> {
        let req = self
            .request(Method::POST, "api/orders", &[], Some(token))?
            .json(order);
        Self::send_json(req, "place order").await
    }

    /// `GET /api/orders/my?status`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(
        &self,
        token: &AuthToken,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, ApiError> {
        let params: Vec<(&str, String)> = status
            .map(|s| ("status", s.as_str().to_string()))
            .into_iter()
            .collect();
        let req = self.request(Method::GET, "api/orders/my", &params, Some(token))?;
        Self::send_json(req, "my orders").await
    }

    /// `GET /api/orders/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn order(&self, token: &AuthToken, id: OrderId) -> Result<Order, ApiError> {
        let req = self.request(Method::GET, &format!("api/orders/{id}"), &[], Some(token))?;
        Self::send_json(req, "order").await
    }

    /// `PUT /api/orders/{id}/cancel`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn cancel_order(&self, token: &AuthToken, id: OrderId) -> Result<(), ApiError> {
        let req = self.request(
            Method::PUT,
            &format!("api/orders/{id}/cancel"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `PUT /api/orders/{id}/receive`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn confirm_receipt(&self, token: &AuthToken, id: OrderId) -> Result<(), ApiError> {
        let req = self.request(
            Method::PUT,
            &format!("api/orders/{id}/receive"),
            &[],
            Some(token),
        )?;
        Self::send_empty(req).await
    }

    /// `GET /api/orders?status&page&size` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn all_orders(
        &self,
        token: &AuthToken,
        status: Option<OrderStatus>,
        page: u32,
        size: u32,
    ) -> Result<Page<Order>, ApiError> {
        let mut params = vec![("page", page.max(1).to_string()), ("size", size.to_string())];
        if let Some(status) = status {
            params.push(("status", status.as_str().to_string()));
        }
        let req = self.request(Method::GET, "api/orders", &params, Some(token))?;
        Self::send_json(req, "all orders").await
    }

    /// `PUT /api/orders/{id}/status` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn set_order_status(
        &self,
        token: &AuthToken,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let req = self
            .request(
                Method::PUT,
                &format!("api/orders/{id}/status"),
                &[],
                Some(token),
            )?
            .json(&StatusChange { status });
        Self::send_empty(req).await
    }
}
