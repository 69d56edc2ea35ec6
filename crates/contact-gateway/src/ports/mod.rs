//! Ports for the contact gateway.

pub mod outbound;

pub use outbound::{Clock, MailError, Mailer, SystemClock};
