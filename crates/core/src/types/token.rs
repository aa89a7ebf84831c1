//! Bearer token issued by the backend at login.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// JWT handed out by `/api/auth/login` and attached to every authenticated
/// backend request.
///
/// The token is kept in the browser's server-side session, so it has to be
/// serializable; `Debug` stays redacted.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// Expose the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl From<SecretString> for AuthToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl Serialize for AuthToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for AuthToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("eyJhbGciOi.secret.sig");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(AuthToken::new("abc").bearer(), "Bearer abc");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&AuthToken::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
        let token: AuthToken = serde_json::from_str(&json).unwrap();
        assert_eq!(token.expose(), "abc");
    }
}
