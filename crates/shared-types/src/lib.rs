//! # Shared Types Crate
//!
//! Contact submission types shared by the form-level flow and the gateway.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the field rules live in [`validation`] and
//!   nowhere else. The form flow in [`form`] and the gateway both call into it.
//! - **Validated by construction**: a [`ValidSubmission`] can only be obtained
//!   through [`validate_submission`], so the mail template never sees raw input.

pub mod errors;
pub mod form;
pub mod submission;
pub mod validation;

pub use errors::ValidationError;
pub use form::{prepare_submission, FieldErrors, FormAction, StatusBanner};
pub use submission::{SubmissionRequest, ValidSubmission};
pub use validation::{
    is_blank, is_valid_email, meets_min_length, validate_submission, Rejection, MIN_MESSAGE_CHARS,
};
