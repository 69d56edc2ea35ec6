//! Middleware stack for the contact gateway.
//!
//! Layer order: Request → Tracing → CORS → Timeout → BodyLimit → Handler

pub mod cors;
pub mod metrics;
pub mod source;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::GatewayMetrics;
pub use source::resolve_source;
pub use timeout::TimeoutLayer;
pub use tracing::TracingLayer;
