//! # Form-Level Flow
//!
//! What the contact form does before and after it talks to the endpoint:
//! per-field feedback, the silent honeypot drop, and turning the endpoint's
//! reply into the banner shown to the visitor.
//!
//! Field checks reuse the predicates from [`crate::validation`], so anything
//! the form lets through is judged by the same rules at the gateway.

use crate::submission::SubmissionRequest;
use crate::validation::{is_blank, is_valid_email, meets_min_length};
use serde::Deserialize;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters";

const SENT_BANNER: &str = "Message sent successfully! I'll get back to you soon.";
const FALLBACK_ERROR_BANNER: &str = "Failed to send message. Please try again.";
const NETWORK_ERROR_BANNER: &str = "Network error. Please check your connection and try again.";

/// Per-field messages. Unlike the gateway, every field is checked so the form
/// can highlight all problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    pub fn check(form: &SubmissionRequest) -> Self {
        let name = is_blank(&form.name).then_some(NAME_REQUIRED);

        let email = if is_blank(&form.email) {
            Some(EMAIL_REQUIRED)
        } else if !is_valid_email(form.email.trim()) {
            Some(EMAIL_INVALID)
        } else {
            None
        };

        let message = if is_blank(&form.message) {
            Some(MESSAGE_REQUIRED)
        } else if !meets_min_length(&form.message) {
            Some(MESSAGE_TOO_SHORT)
        } else {
            None
        };

        Self {
            name,
            email,
            message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

/// What the form should do when the visitor presses send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Honeypot filled: do nothing and show nothing.
    Ignore,
    /// Keep the visitor on the form with these messages.
    ShowErrors(FieldErrors),
    /// Post this payload (honeypot stripped).
    Submit(SubmissionRequest),
}

/// Decide what happens on submit.
pub fn prepare_submission(form: &SubmissionRequest) -> FormAction {
    if form.honeypot_tripped() {
        return FormAction::Ignore;
    }

    let errors = FieldErrors::check(form);
    if !errors.is_empty() {
        return FormAction::ShowErrors(errors);
    }

    FormAction::Submit(form.without_honeypot())
}

/// Banner shown after the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBanner {
    Success(String),
    Error(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl StatusBanner {
    /// Map an endpoint reply to a banner.
    ///
    /// A body that is not JSON is treated like a transport failure, since the
    /// reply most likely came from something other than the endpoint.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(_) => return Self::network_error(),
        };

        if (200..300).contains(&status) {
            return StatusBanner::Success(SENT_BANNER.to_string());
        }

        StatusBanner::Error(
            parsed
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR_BANNER.to_string()),
        )
    }

    pub fn network_error() -> Self {
        StatusBanner::Error(NETWORK_ERROR_BANNER.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusBanner::Success(_))
    }
}
