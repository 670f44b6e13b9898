use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when validating budget input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Category is required")]
    EmptyCategory,
    #[error("Description is required")]
    EmptyDescription,
    #[error("Description too long (max 200 characters)")]
    DescriptionTooLong,
    #[error("Notes too long (max 2000 characters)")]
    NotesTooLong,
    #[error("{field} must be a number")]
    InvalidAmount { field: &'static str },
    #[error("{field} cannot be negative")]
    NegativeAmount { field: &'static str },
    #[error("Category name is required")]
    EmptyCategoryName,
}

impl FieldError for BudgetError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyCategory => "category",
            Self::EmptyDescription | Self::DescriptionTooLong => "description",
            Self::NotesTooLong => "notes",
            Self::InvalidAmount { field } | Self::NegativeAmount { field } => *field,
            Self::EmptyCategoryName => "name",
        }
    }
}
