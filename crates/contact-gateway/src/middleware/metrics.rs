//! Submission counters exposed on the metrics endpoint.

use crate::domain::error::ContactError;
use crate::domain::outcome::SubmissionOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Contact gateway metrics
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    // Submission counters
    pub submissions_total: AtomicU64,
    pub accepted: AtomicU64,
    pub discarded: AtomicU64,

    // Rejections by reason
    pub rate_limited: AtomicU64,
    pub validation_rejected: AtomicU64,
    pub malformed_bodies: AtomicU64,
    pub configuration_errors: AtomicU64,
    pub send_failures: AtomicU64,

    // Send latency (simplified - no histogram)
    pub total_send_ms: AtomicU64,
    pub sends: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one submission
    pub fn record_outcome(&self, outcome: &SubmissionOutcome) {
        self.submissions_total.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            SubmissionOutcome::Accepted => &self.accepted,
            SubmissionOutcome::Discarded => &self.discarded,
            SubmissionOutcome::Rejected(e) => match e {
                ContactError::RateLimited { .. } => &self.rate_limited,
                ContactError::Validation(_) => &self.validation_rejected,
                ContactError::MalformedBody => &self.malformed_bodies,
                ContactError::Configuration => &self.configuration_errors,
                ContactError::SendFailed => &self.send_failures,
                // routed before the gate; never a submission outcome
                ContactError::MethodNotAllowed => return,
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long one mail send took, successful or not
    pub fn record_send(&self, elapsed: Duration) {
        self.total_send_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
        self.sends.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average send latency in ms
    pub fn average_send_ms(&self) -> f64 {
        let total = self.total_send_ms.load(Ordering::Relaxed);
        let count = self.sends.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "submissions": {
                "total": self.submissions_total.load(Ordering::Relaxed),
                "accepted": self.accepted.load(Ordering::Relaxed),
                "discarded": self.discarded.load(Ordering::Relaxed),
            },
            "rejected": {
                "rate_limited": self.rate_limited.load(Ordering::Relaxed),
                "validation": self.validation_rejected.load(Ordering::Relaxed),
                "malformed_body": self.malformed_bodies.load(Ordering::Relaxed),
                "configuration": self.configuration_errors.load(Ordering::Relaxed),
                "send_failed": self.send_failures.load(Ordering::Relaxed),
            },
            "mail": {
                "sends": self.sends.load(Ordering::Relaxed),
                "average_ms": self.average_send_ms(),
            }
        })
    }
}
