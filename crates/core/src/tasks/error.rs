use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when validating task input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Task title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Description too long (max 2000 characters)")]
    DescriptionTooLong,
}

impl FieldError for TaskError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong => "title",
            Self::DescriptionTooLong => "description",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        assert_eq!(TaskError::EmptyTitle.to_string(), "Task title cannot be empty");
        assert_eq!(TaskError::TitleTooLong.field(), "title");
    }
}
