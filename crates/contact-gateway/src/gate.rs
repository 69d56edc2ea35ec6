//! Submission orchestration.
//!
//! One submission runs: rate limit, field validation, mailer configuration
//! check, template rendering, then a single bounded send. The first failing
//! step decides the outcome.

use crate::domain::email::ContactEmail;
use crate::domain::error::ContactError;
use crate::domain::outcome::SubmissionOutcome;
use crate::domain::rate_limit::{RateDecision, RateLimitStore};
use crate::domain::types::{SourceId, SubmissionId};
use crate::middleware::GatewayMetrics;
use crate::ports::{Clock, MailError, Mailer};
use shared_types::{validate_submission, Rejection, SubmissionRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Runs submissions against the rate limiter and the mail transport.
pub struct SubmissionGate {
    limiter: Arc<RateLimitStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    metrics: Arc<GatewayMetrics>,
    subject_prefix: String,
    send_timeout: Duration,
}

impl SubmissionGate {
    pub fn new(
        limiter: Arc<RateLimitStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        metrics: Arc<GatewayMetrics>,
        subject_prefix: impl Into<String>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            limiter,
            mailer,
            clock,
            metrics,
            subject_prefix: subject_prefix.into(),
            send_timeout,
        }
    }

    /// Process one submission from `source`.
    pub async fn submit(
        &self,
        source: &SourceId,
        request: &SubmissionRequest,
    ) -> SubmissionOutcome {
        let id = SubmissionId::new();
        let outcome = self.run(id, source, request).await;
        self.metrics.record_outcome(&outcome);
        debug!(submission_id = %id, outcome = outcome.code(), "Submission finished");
        outcome
    }

    /// Record a body that never parsed, so it shows up next to the other
    /// rejections. The attempt still counts against the source.
    pub fn reject_malformed(&self, source: &SourceId) -> SubmissionOutcome {
        let outcome = match self.limiter.check(source.as_str(), self.clock.now()) {
            RateDecision::Denied { retry_after } => {
                SubmissionOutcome::Rejected(ContactError::RateLimited { retry_after })
            }
            RateDecision::Allowed { .. } => {
                SubmissionOutcome::Rejected(ContactError::MalformedBody)
            }
        };
        self.metrics.record_outcome(&outcome);
        outcome
    }

    async fn run(
        &self,
        id: SubmissionId,
        source: &SourceId,
        request: &SubmissionRequest,
    ) -> SubmissionOutcome {
        if let RateDecision::Denied { retry_after } =
            self.limiter.check(source.as_str(), self.clock.now())
        {
            warn!(
                submission_id = %id,
                source = %source,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            return ContactError::RateLimited { retry_after }.into();
        }

        let submission = match validate_submission(request) {
            Ok(submission) => submission,
            Err(Rejection::Honeypot) => {
                info!(submission_id = %id, source = %source, "Honeypot filled, discarding");
                return SubmissionOutcome::Discarded;
            }
            Err(Rejection::Invalid(e)) => {
                debug!(submission_id = %id, source = %source, reason = e.code(), "Validation failed");
                return ContactError::Validation(e).into();
            }
        };

        if !self.mailer.is_configured() {
            error!(submission_id = %id, "SMTP credentials not configured");
            return ContactError::Configuration.into();
        }

        let email = ContactEmail::compose(&submission, &self.subject_prefix, self.clock.utc_now());

        let started = Instant::now();
        let result = match tokio::time::timeout(self.send_timeout, self.mailer.send(email)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout(self.send_timeout)),
        };
        self.metrics.record_send(started.elapsed());

        match result {
            Ok(()) => {
                info!(submission_id = %id, source = %source, "Contact message sent");
                SubmissionOutcome::Accepted
            }
            Err(e) => {
                error!(submission_id = %id, error = %e, "Failed to send contact message");
                ContactError::SendFailed.into()
            }
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimitStore> {
        &self.limiter
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }
}
