//! # Error Types
//!
//! Field-level validation failures. The display strings are the messages the
//! endpoint returns to callers, so they must stay stable.

use thiserror::Error;

/// Reasons a submission fails structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name, email or message is empty after trimming.
    #[error("All fields are required")]
    MissingFields,

    /// Email does not look like `local@domain.tld`.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Trimmed message is shorter than the minimum length.
    #[error("Message is too short")]
    MessageTooShort,
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing_fields",
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::MessageTooShort => "message_too_short",
        }
    }
}
