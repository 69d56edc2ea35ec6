//! # Submission Validation
//!
//! The single implementation of the contact form field rules. The gateway
//! runs [`validate_submission`] as the authoritative gate; the form flow
//! reuses the same predicates to produce per-field messages.
//!
//! Order matters and checks short-circuit:
//!
//! 1. honeypot filled -> silent drop
//! 2. any field blank after trimming -> missing fields
//! 3. email does not match `local@domain.tld` -> invalid email
//! 4. message shorter than [`MIN_MESSAGE_CHARS`] -> too short

use crate::errors::ValidationError;
use crate::submission::{SubmissionRequest, ValidSubmission};
use regex::Regex;
use std::sync::LazyLock;

/// Minimum message length, counted in characters after trimming.
pub const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Why a submission did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The honeypot was filled. Not surfaced to the sender.
    Honeypot,
    /// A user-correctable field problem.
    Invalid(ValidationError),
}

impl From<ValidationError> for Rejection {
    fn from(e: ValidationError) -> Self {
        Rejection::Invalid(e)
    }
}

/// True when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Simple address shape check: no whitespace, exactly one `@`, and a dot in
/// the domain part.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// True when the trimmed text has at least [`MIN_MESSAGE_CHARS`] characters.
pub fn meets_min_length(message: &str) -> bool {
    message.trim().chars().count() >= MIN_MESSAGE_CHARS
}

/// Validate a submission, returning the trimmed fields on success.
pub fn validate_submission(request: &SubmissionRequest) -> Result<ValidSubmission, Rejection> {
    if request.honeypot_tripped() {
        return Err(Rejection::Honeypot);
    }

    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ValidationError::MissingFields.into());
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail.into());
    }

    if !meets_min_length(message) {
        return Err(ValidationError::MessageTooShort.into());
    }

    Ok(ValidSubmission::new(name, email, message))
}
