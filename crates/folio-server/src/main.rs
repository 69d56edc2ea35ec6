//! # Folio Server
//!
//! Serves the portfolio contact endpoint.
//!
//! ## Startup Sequence
//!
//! 1. Install logging from `FOLIO_*` telemetry variables
//! 2. Load the gateway configuration from the environment
//! 3. Build the SMTP mailer (unconfigured if credentials are missing)
//! 4. Start the gateway: rate-limit sweep task plus HTTP listener
//! 5. Wait for Ctrl+C, then shut both down

use std::sync::Arc;

use anyhow::{Context, Result};
use contact_gateway::{ContactGatewayService, SmtpMailer, SystemClock};
use folio_server::gateway_config_from_env;
use folio_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let _guard = init_telemetry(&telemetry).context("failed to initialize logging")?;

    let config = gateway_config_from_env().context("failed to load configuration")?;
    info!(
        addr = %config.http_addr(),
        path = %config.http.contact_path,
        smtp_host = %config.smtp.host,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Loaded configuration"
    );

    let mailer = SmtpMailer::from_config(&config.smtp, config.timeouts.send)
        .context("failed to build SMTP transport")?;

    let mut service = ContactGatewayService::new(config, Arc::new(mailer), Arc::new(SystemClock))
        .context("invalid gateway configuration")?;
    service
        .start()
        .await
        .context("failed to start contact gateway")?;

    info!("Folio server is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    service.shutdown().await;
    Ok(())
}
