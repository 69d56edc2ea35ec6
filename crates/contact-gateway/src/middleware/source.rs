//! Resolution of the rate-limit key from a request.
//!
//! Order: first `X-Forwarded-For` entry, then `X-Real-IP` (both only when
//! forwarded headers are trusted), then the TCP peer, else the shared
//! unknown bucket. Header values that are not IP addresses are skipped.

use crate::domain::types::SourceId;
use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Work out which source a request counts against.
pub fn resolve_source(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded: bool,
) -> SourceId {
    if trust_forwarded {
        if let Some(ip) = forwarded_for(headers).or_else(|| real_ip(headers)) {
            return SourceId::from(ip);
        }
    }

    match peer {
        Some(addr) => SourceId::from(addr.ip()),
        None => SourceId::unknown(),
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let value = headers.get(X_FORWARDED_FOR)?.to_str().ok()?;
    // Take the first IP (original client)
    value.split(',').next()?.trim().parse().ok()
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers.get(X_REAL_IP)?.to_str().ok()?.trim().parse().ok()
}
