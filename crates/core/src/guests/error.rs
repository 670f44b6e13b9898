use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when validating guest input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuestError {
    #[error("Guest name cannot be empty")]
    EmptyName,
    #[error("Guest name too long (max 200 characters)")]
    NameTooLong,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Table numbers start at 1")]
    InvalidTable,
}

impl FieldError for GuestError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong => "name",
            Self::InvalidEmail(_) => "email",
            Self::InvalidTable => "tableNumber",
        }
    }
}
