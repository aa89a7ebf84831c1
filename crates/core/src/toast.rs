//! Transient user notifications.
//!
//! A [`Toast`] is queued after a mutation and shown once by the next page.
//! Backend failures are mapped to toasts by HTTP status.

use serde::{Deserialize, Serialize};

/// Severity of a toast; drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    /// CSS modifier for the toast element.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message shown once to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";
pub const FORBIDDEN: &str = "You don't have permission to do that.";
pub const NOT_FOUND: &str = "We couldn't find what you were looking for.";
pub const SERVER_ERROR: &str = "Something went wrong on our end. Please try again later.";
pub const REQUEST_FAILED: &str = "The request failed. Please try again.";
pub const UNREACHABLE: &str = "Cannot reach the server. Please check your connection.";

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    /// Toast for a failed backend response.
    ///
    /// 401, 403, 404 and 5xx get fixed wording. Any other status shows the
    /// server's message when it sent a non-blank one.
    #[must_use]
    pub fn for_status(status: u16, server_message: Option<&str>) -> Self {
        let message = match status {
            401 => SESSION_EXPIRED.to_string(),
            403 => FORBIDDEN.to_string(),
            404 => NOT_FOUND.to_string(),
            500..=599 => SERVER_ERROR.to_string(),
            _ => server_message
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map_or_else(|| REQUEST_FAILED.to_string(), str::to_string),
        };
        let level = if status == 401 {
            ToastLevel::Warning
        } else {
            ToastLevel::Error
        };
        Self { level, message }
    }

    /// Toast for any client error.
    #[cfg(feature = "client")]
    #[must_use]
    pub fn from_api_error(error: &crate::api::ApiError) -> Self {
        use crate::api::ApiError;

        match error {
            ApiError::Status { status, message } => Self::for_status(*status, message.as_deref()),
            ApiError::Http(_) => Self::error(UNREACHABLE),
            ApiError::Decode { .. } | ApiError::InvalidUrl(_) => Self::error(SERVER_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(Toast::for_status(401, Some("expired")).message, SESSION_EXPIRED);
        assert_eq!(Toast::for_status(401, None).level, ToastLevel::Warning);
        assert_eq!(Toast::for_status(403, Some("nope")).message, FORBIDDEN);
        assert_eq!(Toast::for_status(404, None).message, NOT_FOUND);
        assert_eq!(Toast::for_status(500, Some("stack trace")).message, SERVER_ERROR);
        assert_eq!(Toast::for_status(502, None).message, SERVER_ERROR);
    }

    #[test]
    fn test_other_status_uses_server_message() {
        let toast = Toast::for_status(400, Some("Insufficient stock for Pocky"));
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Insufficient stock for Pocky");
        assert_eq!(Toast::for_status(409, Some("  ")).message, REQUEST_FAILED);
        assert_eq!(Toast::for_status(422, None).message, REQUEST_FAILED);
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_from_api_error() {
        use crate::api::ApiError;

        let error = ApiError::Status {
            status: 403,
            message: Some("Admins only".to_string()),
        };
        assert_eq!(Toast::from_api_error(&error).message, FORBIDDEN);
        let error = ApiError::InvalidUrl("::".to_string());
        assert_eq!(Toast::from_api_error(&error).message, SERVER_ERROR);
    }
}
