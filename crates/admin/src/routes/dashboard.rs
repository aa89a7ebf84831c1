//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use snackshop_core::Price;
use snackshop_core::models::dashboard::{bar_heights, series_total};
use snackshop_core::models::{DashboardStats, RevenuePoint};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::layout::AdminLayout;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Headline figures.
#[derive(Debug, Clone)]
pub struct StatsView {
    pub revenue: String,
    pub orders: u64,
    pub users: u64,
    pub products: u64,
    pub pending: u64,
}

impl From<&DashboardStats> for StatsView {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            revenue: Price::of(stats.total_revenue).display(),
            orders: stats.total_orders,
            users: stats.total_users,
            products: stats.total_products,
            pending: stats.pending_orders,
        }
    }
}

/// One day in the revenue chart.
#[derive(Debug, Clone)]
pub struct RevenueBarView {
    pub day: String,
    pub revenue: String,
    pub orders: u64,
    /// Bar length as a percentage of the best day.
    pub height: u8,
}

/// Pair each point with its scaled bar height.
#[must_use]
pub fn revenue_bars(points: &[RevenuePoint]) -> Vec<RevenueBarView> {
    points
        .iter()
        .zip(bar_heights(points))
        .map(|(point, height)| RevenueBarView {
            day: point.date.format("%m-%d").to_string(),
            revenue: Price::of(point.revenue).display(),
            orders: point.orders,
            height,
        })
        .collect()
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: AdminLayout,
    pub stats: StatsView,
    pub days: u32,
    pub period_total: String,
    pub bars: Vec<RevenueBarView>,
}

/// Dashboard page handler.
///
/// GET /
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: AdminLayout,
) -> Result<impl IntoResponse> {
    let days = state.config().dashboard_days;
    let (stats, revenue) = tokio::join!(
        state.api().dashboard_stats(&admin.token),
        state.api().revenue(&admin.token, days),
    );
    let stats = stats?;
    let revenue = revenue?;

    Ok(DashboardTemplate {
        layout,
        stats: StatsView::from(&stats),
        days,
        period_total: Price::of(series_total(&revenue)).display(),
        bars: revenue_bars(&revenue),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_revenue_bars_label_days() {
        let points = vec![
            RevenuePoint {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                revenue: Decimal::new(2500, 2),
                orders: 2,
            },
            RevenuePoint {
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                revenue: Decimal::new(5000, 2),
                orders: 3,
            },
        ];
        let bars = revenue_bars(&points);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars.first().unwrap().day, "05-01");
        assert_eq!(bars.first().unwrap().height, 50);
        assert_eq!(bars.get(1).unwrap().revenue, "$50.00");
    }
}
