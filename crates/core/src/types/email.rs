//! Email address type.
//!
//! Customers may leave their email blank at registration; when they fill it
//! in, it is checked here before the form ever reaches the backend.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain`.
    #[error("email must look like name@example.com")]
    Malformed,
    /// The domain has no dot-separated labels.
    #[error("email domain must contain a dot")]
    BareDomain,
}

/// A syntactically plausible email address.
///
/// Leading and trailing whitespace is trimmed and the domain is lowercased,
/// so two spellings of the same address compare equal.
///
/// ```
/// use snackshop_core::Email;
///
/// let email = Email::parse("  Snacker@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Snacker@example.com");
/// assert!(Email::parse("snacker@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, lacks a
    /// single `@` between non-empty parts, or has a domain without a dot.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::Malformed);
        }
        if domain.contains(char::is_whitespace) || local.contains(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::BareDomain);
        }

        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_addresses() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name+chips@shop.co.uk").is_ok());
    }

    #[test]
    fn test_parse_rejects_blank_and_malformed() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@example.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::BareDomain));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_domain_is_lowercased() {
        let email = Email::parse("Crunchy@Snacks.IO").unwrap();
        assert_eq!(email.domain(), "snacks.io");
        assert_eq!(email.to_string(), "Crunchy@snacks.io");
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
        let email: Email = serde_json::from_str("\"a@b.co\"").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.co\"");
    }
}
