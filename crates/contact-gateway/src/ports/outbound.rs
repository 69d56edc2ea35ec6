//! Outbound ports for the contact gateway.

use crate::domain::email::ContactEmail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Time source, injectable so window expiry can be tested without sleeping.
pub trait Clock: Send + Sync {
    /// Monotonic time for rate-limit windows
    fn now(&self) -> Instant;

    /// Wall-clock time stamped into notifications
    fn utc_now(&self) -> DateTime<Utc>;
}

/// System clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mail delivery failures. Details are for the server log only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    /// Credentials or recipient are missing
    #[error("mail transport is not configured")]
    NotConfigured,

    /// An address failed to parse
    #[error("invalid address: {0}")]
    Address(String),

    /// The message could not be assembled
    #[error("failed to build message: {0}")]
    Build(String),

    /// The relay refused or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// No answer within the send timeout
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// False when credentials are missing. Checked before every send.
    fn is_configured(&self) -> bool;

    /// Deliver one notification.
    async fn send(&self, email: ContactEmail) -> Result<(), MailError>;
}
