//! Favorited products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{FavoriteId, Price, ProductId};

/// A product the customer saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_image: Option<String>,
    pub price: Decimal,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// Price for display.
    #[must_use]
    pub fn display_price(&self) -> String {
        Price::of(self.price).display()
    }
}
