//! Status enums for various entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// ```text
/// Pending -> Paid -> Shipped -> Completed
///    \         \        \
///     +---------+--------+--> Cancelled (admin; customers only before shipping)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used for tab bars.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire name of the status, as the backend spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Shipped => "SHIPPED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting payment",
            Self::Paid => "Paid",
            Self::Shipped => "Shipped",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the customer may still cancel the order.
    #[must_use]
    pub const fn customer_can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }

    /// Whether the customer can confirm the parcel arrived.
    #[must_use]
    pub const fn customer_can_confirm_receipt(self) -> bool {
        matches!(self, Self::Shipped)
    }

    /// Whether the order's lines can be reviewed.
    #[must_use]
    pub const fn reviewable(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The next status an admin can advance the order to, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Paid),
            Self::Paid => Some(Self::Shipped),
            Self::Shipped => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether an admin may move an order from `self` to `target`.
    #[must_use]
    pub fn admin_can_transition_to(self, target: Self) -> bool {
        match target {
            Self::Cancelled => !matches!(self, Self::Completed | Self::Cancelled),
            _ => self.next() == Some(target),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Whether a product is listed in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    OnSale,
    OffSale,
}

impl ProductStatus {
    /// The opposite status, for the admin on/off-shelf toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::OnSale => Self::OffSale,
            Self::OffSale => Self::OnSale,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnSale => "On sale",
            Self::OffSale => "Off shelf",
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    Customer,
    /// Full access to the admin console.
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"SHIPPED\""
        );
        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_from_str_is_case_insensitive() {
        assert_eq!("paid".parse::<OrderStatus>(), Ok(OrderStatus::Paid));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_customer_actions() {
        assert!(OrderStatus::Pending.customer_can_cancel());
        assert!(OrderStatus::Paid.customer_can_cancel());
        assert!(!OrderStatus::Shipped.customer_can_cancel());
        assert!(OrderStatus::Shipped.customer_can_confirm_receipt());
        assert!(OrderStatus::Completed.reviewable());
        assert!(!OrderStatus::Shipped.reviewable());
    }

    #[test]
    fn test_admin_transitions() {
        assert!(OrderStatus::Pending.admin_can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Pending.admin_can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.admin_can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.admin_can_transition_to(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn test_product_status_toggle() {
        assert_eq!(ProductStatus::OnSale.toggled(), ProductStatus::OffSale);
        assert_eq!(
            serde_json::to_string(&ProductStatus::OffSale).unwrap(),
            "\"OFF_SALE\""
        );
    }

    #[test]
    fn test_user_role_round_trip_through_str() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(UserRole::Customer.to_string(), "customer");
        assert!("root".parse::<UserRole>().is_err());
    }
}
