//! # Folio Telemetry
//!
//! Structured logging for the contact relay.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FOLIO_SERVICE_NAME` | `folio` | Service name in log lines |
//! | `FOLIO_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `FOLIO_JSON_LOGS` | `false` (`true` in containers) | Emit JSON lines |
//! | `FOLIO_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `FOLIO_ENVIRONMENT` | `development` | Deployment environment label |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global `tracing` subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Guard that marks telemetry as active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
