//! Client error types.

use planhaus_core::sanitize::UploadError;
use planhaus_core::validation::FieldError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
///
/// Cloneable so a single failed fetch can be handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Your session has expired. Please log in again")]
    SessionExpired,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ClientError {
    /// Wraps a form validation error, keeping the field it belongs to.
    pub fn validation(err: &impl FieldError) -> Self {
        Self::Validation {
            field: err.field(),
            message: err.to_string(),
        }
    }

    /// Transport failures and server-side (5xx) errors may succeed on a
    /// later attempt; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planhaus_core::budget::BudgetError;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Network("refused".into()).is_retryable());
        assert!(ClientError::Api {
            status: 503,
            message: "down".into()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 404,
            message: "missing".into()
        }
        .is_retryable());
        assert!(!ClientError::SessionExpired.is_retryable());
        assert!(!ClientError::InvalidResponse("null".into()).is_retryable());
        assert!(!ClientError::Cancelled.is_retryable());
    }

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Category is required".into(),
        };
        assert_eq!(err.to_string(), "Category is required");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_validation_keeps_field() {
        let err = ClientError::validation(&BudgetError::EmptyDescription);
        assert_eq!(
            err,
            ClientError::Validation {
                field: "description",
                message: "Description is required".into()
            }
        );
    }

    #[test]
    fn test_upload_error_conversion() {
        let err: ClientError = UploadError::Empty.into();
        assert_eq!(err.to_string(), "File is empty");
    }
}
