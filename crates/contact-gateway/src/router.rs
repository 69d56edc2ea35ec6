//! HTTP surface of the gateway.
//!
//! The contact path answers `POST` and plain `OPTIONS`; every other verb gets
//! a JSON 405. CORS preflights are answered by the CORS layer before routing.

use crate::domain::config::GatewayConfig;
use crate::domain::error::ContactError;
use crate::domain::outcome::{SubmissionOutcome, SUCCESS_MESSAGE};
use crate::gate::SubmissionGate;
use crate::middleware::{create_cors_layer, resolve_source, TimeoutLayer, TracingLayer};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared_types::SubmissionRequest;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<SubmissionGate>,
    pub trust_forwarded_headers: bool,
}

/// Build the full router with its middleware stack.
pub fn build_router(config: &GatewayConfig, gate: Arc<SubmissionGate>) -> Router {
    let state = AppState {
        gate,
        trust_forwarded_headers: config.source.trust_forwarded_headers,
    };

    let middleware = ServiceBuilder::new()
        .layer(TracingLayer::new())
        .layer(create_cors_layer(&config.cors))
        .layer(TimeoutLayer::new(config.timeouts.request));

    Router::new()
        .route(
            &config.http.contact_path,
            post(handle_contact)
                .options(handle_options)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.limits.max_body_size))
        .layer(middleware)
        .with_state(state)
}

/// Handle a contact form submission
async fn handle_contact(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let source = resolve_source(&headers, peer, state.trust_forwarded_headers);

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(source = %source, error = %rejection, "Unreadable request body");
            return error_response(rejection.status(), &ContactError::MalformedBody.to_string());
        }
    };

    let outcome = match serde_json::from_slice::<SubmissionRequest>(&body) {
        Ok(request) => state.gate.submit(&source, &request).await,
        Err(e) => {
            debug!(source = %source, error = %e, "Request body is not a submission object");
            state.gate.reject_malformed(&source)
        }
    };

    outcome.into_response()
}

async fn handle_options() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    ContactError::MethodNotAllowed.into_response()
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "folio-contact-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "tracked_sources": state.gate.limiter().tracked_sources(),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.gate.metrics().to_json())
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        match self {
            SubmissionOutcome::Accepted | SubmissionOutcome::Discarded => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "message": SUCCESS_MESSAGE,
                })),
            )
                .into_response(),
            SubmissionOutcome::Rejected(e) => e.into_response(),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = error_response(status, &self.to_string());

        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
