//! Unified error type for API calls.
//!
//! Every endpoint returns `Result<T, ApiError>`. Hooks never show the raw
//! error to the user; they store [`ApiError::user_message`] instead.

use thiserror::Error;

use crate::forms::FormError;

/// Errors produced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP 401. The session has already been expired when this is returned.
    #[error("Unauthorized")]
    Unauthorized,

    /// HTTP 403.
    #[error("Forbidden")]
    Forbidden,

    /// HTTP 404.
    #[error("Not found")]
    NotFound,

    /// HTTP 400 with the server's message, if any.
    #[error("Bad request: {}", .0.as_deref().unwrap_or("no message"))]
    BadRequest(Option<String>),

    /// Any other non-2xx status.
    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// A 2xx response whose envelope reported failure.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client-side validation failed; no request was sent.
    #[error(transparent)]
    Validation(#[from] FormError),

    /// The owning hook was torn down before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message
                .clone()
                .unwrap_or_else(|| "Bad request. Please check your input.".to_string()),
            Self::Unauthorized => "Authentication failed. Please login again.".to_string(),
            Self::Forbidden => "You do not have permission to perform this action.".to_string(),
            Self::NotFound => "The requested resource was not found.".to_string(),
            Self::Server { status: 500, .. } => "Server error. Please try again later.".to_string(),
            Self::Server { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("Server error: {status}")),
            Self::Network(_) | Self::Timeout => {
                "Network error. Please check your internet connection.".to_string()
            }
            Self::Rejected(message) => message.clone(),
            Self::Validation(e) => e.to_string(),
            Self::Decode(_) => "An unexpected error occurred.".to_string(),
            Self::Cancelled => "Request cancelled.".to_string(),
        }
    }

    /// Whether the error came from the session being rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_by_status() {
        assert_eq!(
            ApiError::BadRequest(None).user_message(),
            "Bad request. Please check your input."
        );
        assert_eq!(
            ApiError::BadRequest(Some("Quantity must be positive".into())).user_message(),
            "Quantity must be positive"
        );
        assert_eq!(
            ApiError::Unauthorized.user_message(),
            "Authentication failed. Please login again."
        );
        assert_eq!(
            ApiError::Forbidden.user_message(),
            "You do not have permission to perform this action."
        );
        assert_eq!(
            ApiError::NotFound.user_message(),
            "The requested resource was not found."
        );
        assert_eq!(
            ApiError::Server {
                status: 500,
                message: Some("ORA-00942".into())
            }
            .user_message(),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_user_message_other_status() {
        assert_eq!(
            ApiError::Server {
                status: 502,
                message: None
            }
            .user_message(),
            "Server error: 502"
        );
        assert_eq!(
            ApiError::Server {
                status: 405,
                message: Some("Method not allowed".into())
            }
            .user_message(),
            "Method not allowed"
        );
    }

    #[test]
    fn test_user_message_network() {
        let msg = "Network error. Please check your internet connection.";
        assert_eq!(ApiError::Network("refused".into()).user_message(), msg);
        assert_eq!(ApiError::Timeout.user_message(), msg);
    }

    #[test]
    fn test_validation_passes_form_message_through() {
        let err = ApiError::from(FormError::PasswordMismatch);
        assert_eq!(err.user_message(), "Passwords do not match");
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::Rejected("Plant not found".into()).to_string(),
            "Request rejected: Plant not found"
        );
        assert_eq!(
            ApiError::BadRequest(None).to_string(),
            "Bad request: no message"
        );
    }
}
