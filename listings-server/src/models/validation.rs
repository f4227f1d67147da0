//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric field could not be parsed, or parsed to NaN/infinity
    NotANumber { field: &'static str, value: String },

    /// Numeric field must be greater than zero
    NotPositive { field: &'static str },

    /// Count field must not be negative
    Negative { field: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Update request carried no fields
    NoChanges,

    /// Request path, query, or body could not be decoded
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NotANumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            Self::NotPositive { field } => write!(f, "{} must be greater than zero", field),
            Self::Negative { field } => write!(f, "{} cannot be negative", field),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::NoChanges => write!(f, "update must contain at least one field"),
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
