use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when validating project input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Project name cannot be empty")]
    EmptyName,
    #[error("Project name too long (max 200 characters)")]
    NameTooLong,
    #[error("Total budget must be a non-negative number")]
    InvalidBudget,
}

impl FieldError for ProjectError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong => "name",
            Self::InvalidBudget => "totalBudget",
        }
    }
}
