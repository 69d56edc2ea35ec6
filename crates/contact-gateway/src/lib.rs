// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Folio contact gateway - the HTTP endpoint behind the portfolio contact form.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      CONTACT GATEWAY                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │   POST /api/contact        GET /health        GET /metrics   │
//! │          │                                                   │
//! │  ┌───────┴──────────────────────────────────┐                │
//! │  │            Middleware Stack              │                │
//! │  │   Tracing → CORS → Timeout → BodyLimit   │                │
//! │  └───────┬──────────────────────────────────┘                │
//! │          │                                                   │
//! │  ┌───────┴──────────────────────────────────┐                │
//! │  │             SubmissionGate               │                │
//! │  │  RateLimitStore → validate → render mail │                │
//! │  └───────┬──────────────────────────────────┘                │
//! └──────────┼───────────────────────────────────────────────────┘
//!            │ Mailer port
//!            ▼
//!      SMTP relay (lettre)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use contact_gateway::{ContactGatewayService, GatewayConfig, SmtpMailer, SystemClock};
//!
//! let config = GatewayConfig::default();
//! let mailer = SmtpMailer::from_config(&config.smtp, config.timeouts.send)?;
//! let mut service = ContactGatewayService::new(config, Arc::new(mailer), Arc::new(SystemClock))?;
//! service.start().await?;
//! ```
//!
//! # Abuse controls
//!
//! - Fixed-window rate limit per source, checked before anything else
//! - Honeypot field: filled submissions get a success reply and are dropped
//! - Request body size limit and a request-level timeout

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod gate;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;

// Re-exports for public API
pub use adapters::{ManualClock, RecordingMailer, SmtpMailer};
pub use domain::config::GatewayConfig;
pub use domain::error::{ContactError, GatewayError};
pub use domain::outcome::{SubmissionOutcome, SUCCESS_MESSAGE};
pub use domain::rate_limit::{RateDecision, RateLimitStore};
pub use domain::types::{SourceId, SubmissionId};
pub use gate::SubmissionGate;
pub use middleware::GatewayMetrics;
pub use ports::{Clock, MailError, Mailer, SystemClock};
pub use router::build_router;
pub use service::ContactGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
