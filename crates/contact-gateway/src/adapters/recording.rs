//! In-memory mailer that records what it was asked to send.
//!
//! Used by the integration tests and for running the server without a relay.

use crate::domain::email::ContactEmail;
use crate::ports::{MailError, Mailer};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mailer double with switchable behaviour.
#[derive(Debug)]
pub struct RecordingMailer {
    configured: bool,
    failure: Option<MailError>,
    delay: Option<Duration>,
    attempts: AtomicUsize,
    sent: Mutex<Vec<ContactEmail>>,
}

impl RecordingMailer {
    /// Has credentials and delivers everything.
    pub fn configured() -> Self {
        Self {
            configured: true,
            failure: None,
            delay: None,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Missing credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured()
        }
    }

    /// Configured, but every send fails with `error`.
    pub fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::configured()
        }
    }

    /// Wait `delay` before completing each send.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Emails delivered so far
    pub fn sent(&self) -> Vec<ContactEmail> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Calls to `send`, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, email: ContactEmail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.configured {
            return Err(MailError::NotConfigured);
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        self.sent.lock().push(email);
        Ok(())
    }
}
