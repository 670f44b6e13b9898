use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when validating vendor input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VendorError {
    #[error("Vendor name cannot be empty")]
    EmptyName,
    #[error("Vendor name too long (max 200 characters)")]
    NameTooLong,
    #[error("Vendor category is required")]
    EmptyCategory,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Cost must be a number")]
    InvalidCost,
    #[error("Cost cannot be negative")]
    NegativeCost,
    #[error("Notes too long (max 2000 characters)")]
    NotesTooLong,
}

impl FieldError for VendorError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong => "name",
            Self::EmptyCategory => "category",
            Self::InvalidEmail(_) => "email",
            Self::InvalidCost | Self::NegativeCost => "cost",
            Self::NotesTooLong => "notes",
        }
    }
}
