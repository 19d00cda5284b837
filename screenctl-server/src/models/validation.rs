//! Validation error types

use std::fmt;

/// Validation error for domain models and request bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is absent from the request
    Missing { field: &'static str },

    /// Field is below minimum length
    TooShort { field: &'static str, min: usize },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Second entry of a confirmed field differs from the first
    Mismatch { field: &'static str },

    /// Value already belongs to another account
    Taken { field: &'static str },

    /// Request could not be decoded at all
    Malformed { field: &'static str, detail: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Mismatch { field } => write!(f, "{} does not match", field),
            Self::Taken { field } => write!(f, "{} is already taken", field),
            Self::Malformed { field, detail } => write!(f, "invalid {}: {}", field, detail),
        }
    }
}

impl std::error::Error for ValidationError {}
