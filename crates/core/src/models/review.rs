//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, ProductId, ReviewId, UserId};

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub rating: u8,
    pub content: String,
    #[serde(with = "crate::types::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Rating as filled and empty stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(NewReview::MAX_RATING));
        let empty = usize::from(NewReview::MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

/// Payload for `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub rating: u8,
    pub content: String,
}

impl NewReview {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;
}

/// Mean rating of a set of reviews, one decimal place.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f32> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)] // review counts are tiny
    let mean = sum as f32 / reviews.len() as f32;
    Some((mean * 10.0).round() / 10.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        Review {
            id: ReviewId::new(1),
            product_id: ProductId::new(1),
            user_id: UserId::new(1),
            username: None,
            order_id: None,
            rating,
            content: "crunchy".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stars() {
        assert_eq!(review(3).stars(), "★★★☆☆");
        assert_eq!(review(9).stars(), "★★★★★");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[review(5), review(4), review(4)]), Some(4.3));
    }
}
