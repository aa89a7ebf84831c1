use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{DashboardStats, RevenuePoint};
use crate::types::AuthToken;

impl ApiClient {
    /// `GET /api/dashboard/stats` (admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn dashboard_stats(&self, token: &AuthToken) -> Result<DashboardStats, ApiError> {
        let req = self.request(Method::GET, "api/dashboard/stats", &[], Some(token))?;
        Self::send_json(req, "dashboard stats").await
    }

    /// `GET /api/dashboard/revenue?days` (admin), oldest day first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn revenue(&self, token: &AuthToken, days: u32) -> Result<Vec<RevenuePoint>, ApiError> {
        let params = [("days", days.to_string())];
        let req = self.request(Method::GET, "api/dashboard/revenue", &params, Some(token))?;
        let mut points: Vec<RevenuePoint> = Self::send_json(req, "revenue").await?;
        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    /// `GET /api/health`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    #[instrument(skip_all)]
    pub async fn health(&self) -> Result<(), ApiError> {
        let req = self.request(Method::GET, "api/health", &[], None)?;
        Self::send_empty(req).await
    }
}
