//! Result of running one submission through the gate.

use crate::domain::error::ContactError;

/// Message returned to the caller for accepted (and silently discarded)
/// submissions.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully";

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The mail transport accepted the message.
    Accepted,
    /// The honeypot was filled. Nothing was sent; the caller is told it was.
    Discarded,
    /// Refused for the given reason.
    Rejected(ContactError),
}

impl SubmissionOutcome {
    /// True for outcomes the caller sees as success.
    pub fn looks_successful(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Accepted | SubmissionOutcome::Discarded
        )
    }

    /// Short label for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted => "accepted",
            SubmissionOutcome::Discarded => "discarded",
            SubmissionOutcome::Rejected(e) => e.code(),
        }
    }
}

impl From<ContactError> for SubmissionOutcome {
    fn from(e: ContactError) -> Self {
        SubmissionOutcome::Rejected(e)
    }
}
