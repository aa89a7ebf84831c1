//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Backend amounts arrive as bare decimals; the shop trades in a single
/// currency, so the code defaults to USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the shop's default currency.
    #[must_use]
    pub fn of(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.amount.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-{}{:.2}", self.currency_code.symbol(), rounded.abs())
        } else {
            write!(f, "{}{:.2}", self.currency_code.symbol(), rounded.abs())
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CNY,
}

impl CurrencyCode {
    /// Currency symbol used when rendering prices.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CNY => "¥",
        }
    }
}
