//! Contact gateway error taxonomy.
//!
//! Display strings are what the caller sees. Validation and rate-limit
//! messages are actionable and safe; configuration and transport failures
//! carry only a generic message, with the detail going to the server log.

use shared_types::ValidationError;
use std::time::Duration;

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    /// Wrong HTTP verb
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Source exceeded its attempts for the current window
    #[error("Too many requests. Please try again later.")]
    RateLimited {
        /// Time left in the current window
        retry_after: Duration,
    },

    /// Field-level validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body was not a JSON object
    #[error("Invalid request body")]
    MalformedBody,

    /// Mail credentials are missing from the deployment
    #[error("Server configuration error. Please try again later.")]
    Configuration,

    /// The mail transport rejected or failed the delivery
    #[error("Failed to send message. Please try again later.")]
    SendFailed,
}

impl ContactError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::MethodNotAllowed => "method_not_allowed",
            ContactError::RateLimited { .. } => "rate_limited",
            ContactError::Validation(e) => e.code(),
            ContactError::MalformedBody => "malformed_body",
            ContactError::Configuration => "configuration_error",
            ContactError::SendFailed => "send_failed",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ContactError::MethodNotAllowed => 405,
            ContactError::RateLimited { .. } => 429,
            ContactError::Validation(_) | ContactError::MalformedBody => 400,
            ContactError::Configuration | ContactError::SendFailed => 500,
        }
    }

    /// Whether the sender can fix this by changing the submission.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ContactError::Validation(_) | ContactError::MalformedBody
        )
    }

    /// Retry-After in whole seconds, rounded up, for rate-limit denials.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ContactError::RateLimited { retry_after } => {
                let millis = retry_after.as_millis() as u64;
                Some(millis.div_ceil(1000).max(1))
            }
            _ => None,
        }
    }
}

/// Gateway-level errors (lifecycle, not per request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Service already running
    #[error("service already started")]
    AlreadyStarted,
}
