//! Admin dashboard figures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Headline store numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub total_users: u64,
    pub total_products: u64,
    #[serde(default)]
    pub pending_orders: u64,
}

/// Revenue for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    #[serde(default)]
    pub orders: u64,
}

/// Sum of a revenue series.
#[must_use]
pub fn series_total(points: &[RevenuePoint]) -> Decimal {
    points.iter().map(|p| p.revenue).sum()
}

/// Bar heights in percent of the best day, for the dashboard chart.
#[must_use]
pub fn bar_heights(points: &[RevenuePoint]) -> Vec<u8> {
    let max = points
        .iter()
        .map(|p| p.revenue)
        .max()
        .unwrap_or(Decimal::ZERO);
    if max <= Decimal::ZERO {
        return vec![0; points.len()];
    }
    points
        .iter()
        .map(|p| {
            let pct = (p.revenue.max(Decimal::ZERO) * Decimal::ONE_HUNDRED / max).round();
            pct.to_u8().unwrap_or(100).min(100)
        })
        .collect()
}
