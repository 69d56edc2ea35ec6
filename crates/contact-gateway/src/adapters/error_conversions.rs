//! Error conversions from lettre types.
//!
//! These conversions involve transport types and belong in the adapters layer.

use crate::ports::MailError;

impl From<lettre::address::AddressError> for MailError {
    fn from(e: lettre::address::AddressError) -> Self {
        MailError::Address(e.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(e: lettre::error::Error) -> Self {
        MailError::Build(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(e.to_string())
    }
}
