//! Contact gateway service - lifecycle entry point.
//!
//! Owns the rate-limit store, the sweep task and the HTTP listener.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::domain::rate_limit::{sweep_task, RateLimitStore};
use crate::gate::SubmissionGate;
use crate::middleware::GatewayMetrics;
use crate::ports::{Clock, Mailer};
use crate::router::build_router;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Running tasks owned by a started service
struct Running {
    local_addr: SocketAddr,
    server: JoinHandle<()>,
    sweeper: JoinHandle<()>,
}

/// Contact gateway service state
pub struct ContactGatewayService {
    config: GatewayConfig,
    gate: Arc<SubmissionGate>,
    clock: Arc<dyn Clock>,
    shutdown_tx: watch::Sender<bool>,
    running: Option<Running>,
}

impl ContactGatewayService {
    /// Create a new contact gateway service
    pub fn new(
        config: GatewayConfig,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        if !mailer.is_configured() {
            warn!("Mail transport is not configured; submissions will fail until SMTP_USER and SMTP_APP_PASSWORD are set");
        }

        let limiter = Arc::new(RateLimitStore::new(config.rate_limit.clone()));
        let gate = Arc::new(SubmissionGate::new(
            limiter,
            mailer,
            Arc::clone(&clock),
            Arc::new(GatewayMetrics::new()),
            config.smtp.subject_prefix.clone(),
            config.timeouts.send,
        ));

        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            gate,
            clock,
            shutdown_tx,
            running: None,
        })
    }

    /// Bind the listener, start the sweep task and begin serving.
    ///
    /// Returns once the listener is bound; serving continues in the
    /// background until [`shutdown`](Self::shutdown).
    pub async fn start(&mut self) -> Result<SocketAddr, GatewayError> {
        if self.running.is_some() {
            return Err(GatewayError::AlreadyStarted);
        }

        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        // Reset in case of a restart after shutdown
        self.shutdown_tx.send_replace(false);

        let sweeper = tokio::spawn(sweep_task(
            Arc::clone(self.gate.limiter()),
            Arc::clone(&self.clock),
            self.config.rate_limit.sweep_interval,
            self.shutdown_tx.subscribe(),
        ));

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // Resolves on the first `true`, or when the sender is gone
                    let _ = shutdown_rx.wait_for(|stop| *stop).await;
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        });

        info!(
            addr = %local_addr,
            path = %self.config.http.contact_path,
            "Contact gateway listening"
        );

        self.running = Some(Running {
            local_addr,
            server,
            sweeper,
        });
        Ok(local_addr)
    }

    /// Stop the listener and the sweep task, waiting for both to finish.
    pub async fn shutdown(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        info!("Shutting down contact gateway");
        self.shutdown_tx.send_replace(true);

        if let Err(e) = running.server.await {
            error!(error = %e, "HTTP server task failed");
        }
        if let Err(e) = running.sweeper.await {
            error!(error = %e, "Sweep task failed");
        }

        info!("Contact gateway stopped");
    }

    /// Router without a listener, for in-process use.
    pub fn router(&self) -> Router {
        build_router(&self.config, Arc::clone(&self.gate))
    }

    /// Address the listener is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn gate(&self) -> Arc<SubmissionGate> {
        Arc::clone(&self.gate)
    }

    pub fn rate_limit_store(&self) -> Arc<RateLimitStore> {
        Arc::clone(self.gate.limiter())
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(self.gate.metrics())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
