//! Form checks run before any backend call.
//!
//! Handlers call [`Validate::validate`] on the submitted form and re-render
//! it with the errors instead of calling the backend when any are found.

use std::fmt;

use rust_decimal::Decimal;

use crate::models::{AddressInput, CategoryInput, LoginRequest, NewReview, ProductInput, RegisterRequest};
use crate::types::Email;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Number of digits in a postal code.
pub const POSTAL_CODE_LEN: usize = 6;

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record "`label` is required" when `value` is blank.
    pub fn require(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that can check itself.
pub trait Validate {
    /// # Errors
    ///
    /// Returns every field problem found.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("username", "Username", &self.username);
        errors.require("password", "Password", &self.password);
        errors.into_result()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("username", "Username", &self.username);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords do not match");
        }
        if let Some(email) = self.email.as_deref()
            && !email.trim().is_empty()
            && Email::parse(email).is_err()
        {
            errors.add("email", "Enter a valid email address");
        }
        errors.into_result()
    }
}

impl Validate for AddressInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("receiver_name", "Receiver name", &self.receiver_name);
        errors.require("phone", "Phone", &self.phone);
        errors.require("province", "Province", &self.province);
        errors.require("city", "City", &self.city);
        errors.require("district", "District", &self.district);
        errors.require("detail", "Street address", &self.detail);

        let postal_code = self.postal_code.trim();
        if postal_code.is_empty() {
            errors.add("postal_code", "Postal code is required");
        } else if postal_code.len() != POSTAL_CODE_LEN
            || !postal_code.chars().all(|c| c.is_ascii_digit())
        {
            errors.add(
                "postal_code",
                format!("Postal code must be {POSTAL_CODE_LEN} digits"),
            );
        }
        errors.into_result()
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            errors.add(
                "rating",
                format!(
                    "Rating must be between {} and {}",
                    Self::MIN_RATING,
                    Self::MAX_RATING
                ),
            );
        }
        errors.require("content", "Review", &self.content);
        errors.into_result()
    }
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        if self.price <= Decimal::ZERO {
            errors.add("price", "Price must be greater than zero");
        }
        if self.stock < 0 {
            errors.add("stock", "Stock cannot be negative");
        }
        errors.into_result()
    }
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        errors.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{OrderId, ProductId};

    fn address() -> AddressInput {
        AddressInput {
            receiver_name: "Ann".to_string(),
            phone: "5550100".to_string(),
            province: "Ontario".to_string(),
            city: "Toronto".to_string(),
            district: "Downtown".to_string(),
            detail: "12 Queen St".to_string(),
            postal_code: "100001".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginRequest::default().validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.message_for("username"), Some("Username is required"));
    }

    #[test]
    fn test_register_rules() {
        let mut form = RegisterRequest {
            username: "ann".to_string(),
            password: "abc".to_string(),
            password_confirm: "abd".to_string(),
            email: Some("not-an-email".to_string()),
            phone: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.message_for("password").is_some());
        assert_eq!(errors.message_for("password_confirm"), Some("Passwords do not match"));
        assert!(errors.message_for("email").is_some());

        form.password = "abcdef".to_string();
        form.password_confirm = "abcdef".to_string();
        form.email = Some(String::new());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_address_postal_code() {
        assert!(address().validate().is_ok());

        let mut form = address();
        form.postal_code = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.message_for("postal_code"), Some("Postal code is required"));

        form.postal_code = "12A456".to_string();
        assert!(form.validate().is_err());
        form.postal_code = "1234567".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_address_requires_every_field() {
        let errors = AddressInput::default().validate().unwrap_err();
        assert_eq!(errors.errors().len(), 7);
    }

    #[test]
    fn test_review_rating_bounds() {
        let mut review = NewReview {
            product_id: ProductId::new(1),
            order_id: OrderId::new(2),
            rating: 0,
            content: "Crunchy".to_string(),
        };
        assert!(review.validate().is_err());
        review.rating = 5;
        assert!(review.validate().is_ok());
        review.rating = 6;
        assert!(review.validate().is_err());
        review.rating = 3;
        review.content = " ".to_string();
        assert!(review.validate().is_err());
    }

    #[test]
    fn test_product_rules() {
        let mut form = ProductInput {
            name: "Pocky".to_string(),
            price: Decimal::new(199, 2),
            stock: 0,
            ..ProductInput::default()
        };
        assert!(form.validate().is_ok());
        form.price = Decimal::ZERO;
        form.stock = -1;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.to_string(), "Price must be greater than zero; Stock cannot be negative");
    }

    #[test]
    fn test_category_requires_name() {
        assert!(CategoryInput::default().validate().is_err());
    }
}
