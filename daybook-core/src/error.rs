//! Validation errors raised at the boundary, before data reaches the core.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejections produced while turning raw input into core types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown {kind} '{value}'")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("recurrence end {end} is before the anchor day {anchor}")]
    InvalidRange { anchor: NaiveDate, end: NaiveDate },

    #[error("task title must not be empty")]
    EmptyTitle,
}

impl ValidationError {
    pub(crate) fn invalid_enum(kind: &'static str, value: &str) -> Self {
        Self::InvalidEnum {
            kind,
            value: value.to_string(),
        }
    }
}

/// Errors from mutating a [`crate::TaskBook`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("no task with id '{0}'")]
    UnknownTask(String),

    #[error("a task with id '{0}' already exists")]
    DuplicateId(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
