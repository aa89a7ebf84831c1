//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, OrderDetailId, OrderId, OrderStatus, Price, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_no: String,
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub shipping_address: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "crate::types::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Total for display.
    #[must_use]
    pub fn display_total(&self) -> String {
        Price::of(self.total_amount).display()
    }

    /// Sum of the line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.details.iter().map(|d| d.quantity).sum()
    }

    /// Lines the customer has not reviewed yet, if the order allows reviews.
    pub fn reviewable_lines(&self) -> impl Iterator<Item = &OrderDetail> {
        let open = self.status.reviewable();
        self.details.iter().filter(move |d| open && !d.reviewed)
    }
}

/// One product line of an order, with the price captured at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderDetailId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_image: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub reviewed: bool,
}

impl OrderDetail {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Checkout payload for `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub address_id: AddressId,
    pub items: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 9,
            "orderNo": "SN202405010001",
            "userId": 1,
            "status": "COMPLETED",
            "totalAmount": "12.00",
            "receiverName": "Ann",
            "receiverPhone": "5550100",
            "shippingAddress": "1 Main St",
            "createdAt": "2024-05-01T09:30:00",
            "details": [
                {"id": 1, "productId": 3, "productName": "Chips", "price": 2.5, "quantity": 2, "reviewed": true},
                {"id": 2, "productId": 4, "productName": "Pretzels", "price": "3.5", "quantity": 2}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_order_decodes_backend_shape() {
        let order = sample();
        assert_eq!(order.item_count(), 4);
        assert_eq!(order.display_total(), "$12.00");
        assert_eq!(order.details[1].subtotal(), Decimal::new(7, 0));
    }

    #[test]
    fn test_reviewable_lines_skip_reviewed() {
        let order = sample();
        let open: Vec<_> = order.reviewable_lines().map(|d| d.product_id).collect();
        assert_eq!(open, vec![ProductId::new(4)]);

        let mut shipped = order;
        shipped.status = OrderStatus::Shipped;
        assert_eq!(shipped.reviewable_lines().count(), 0);
    }
}
