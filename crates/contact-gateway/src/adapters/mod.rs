//! Adapters for the contact gateway.
//!
//! Infrastructure implementations of the clock and mailer ports.

mod error_conversions;

pub mod clock;
pub mod recording;
pub mod smtp;

pub use clock::ManualClock;
pub use recording::RecordingMailer;
pub use smtp::SmtpMailer;
