//! Domain types for the contact gateway.
//!
//! Configuration, the error taxonomy, the rate-limit store and the
//! notification template. Nothing here performs I/O; time and mail
//! delivery come in through the ports.

pub mod config;
pub mod email;
pub mod error;
pub mod outcome;
pub mod rate_limit;
pub mod types;

pub use config::{
    ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, RateLimitConfig, SmtpConfig,
    SourceConfig, TimeoutConfig,
};
pub use email::ContactEmail;
pub use error::{ContactError, GatewayError};
pub use outcome::{SubmissionOutcome, SUCCESS_MESSAGE};
pub use rate_limit::{sweep_task, RateDecision, RateLimitStore, WindowRecord};
pub use types::{SourceId, SubmissionId};
