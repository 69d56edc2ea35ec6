//! # Environment Configuration
//!
//! Overlays environment variables onto [`GatewayConfig::default`].
//!
//! | Variable | Field |
//! |---|---|
//! | `FOLIO_HOST` | `http.host` |
//! | `FOLIO_PORT`, else `PORT` | `http.port` |
//! | `FOLIO_CONTACT_PATH` | `http.contact_path` |
//! | `SMTP_HOST` / `SMTP_PORT` / `SMTP_SECURE` | relay |
//! | `SMTP_USER` / `SMTP_APP_PASSWORD` | credentials |
//! | `CONTACT_RECIPIENT` | inbox (default: `SMTP_USER`) |
//! | `FOLIO_RATE_LIMIT_MAX` / `FOLIO_RATE_LIMIT_WINDOW` | rate limit |
//! | `FOLIO_SEND_TIMEOUT` | `timeouts.send` |
//! | `FOLIO_TRUST_FORWARDED` | `source.trust_forwarded_headers` |
//!
//! Unset or empty variables keep the default. Values that do not parse are
//! an error rather than silently ignored.

use contact_gateway::domain::config::parse_duration;
use contact_gateway::GatewayConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct EnvConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Load the gateway configuration from the process environment.
pub fn gateway_config_from_env() -> Result<GatewayConfig, EnvConfigError> {
    gateway_config_from_lookup(|key| env::var(key).ok())
}

/// Same as [`gateway_config_from_env`] with an arbitrary variable source.
pub fn gateway_config_from_lookup<F>(lookup: F) -> Result<GatewayConfig, EnvConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = GatewayConfig::default();

    if let Some(host) = get("FOLIO_HOST") {
        config.http.host = parse("FOLIO_HOST", &host)?;
    }
    if let Some(port) = get("FOLIO_PORT") {
        config.http.port = parse("FOLIO_PORT", &port)?;
    } else if let Some(port) = get("PORT") {
        config.http.port = parse("PORT", &port)?;
    }
    if let Some(path) = get("FOLIO_CONTACT_PATH") {
        config.http.contact_path = path;
    }

    if let Some(host) = get("SMTP_HOST") {
        config.smtp.host = host;
    }
    if let Some(port) = get("SMTP_PORT") {
        config.smtp.port = parse("SMTP_PORT", &port)?;
    }
    if let Some(secure) = get("SMTP_SECURE") {
        config.smtp.secure = parse_bool("SMTP_SECURE", &secure)?;
    }
    config.smtp.username = get("SMTP_USER");
    config.smtp.password = get("SMTP_APP_PASSWORD");
    config.smtp.recipient = get("CONTACT_RECIPIENT");

    if let Some(max) = get("FOLIO_RATE_LIMIT_MAX") {
        config.rate_limit.max_requests = parse("FOLIO_RATE_LIMIT_MAX", &max)?;
    }
    if let Some(window) = get("FOLIO_RATE_LIMIT_WINDOW") {
        config.rate_limit.window = duration("FOLIO_RATE_LIMIT_WINDOW", &window)?;
    }
    if let Some(timeout) = get("FOLIO_SEND_TIMEOUT") {
        config.timeouts.send = duration("FOLIO_SEND_TIMEOUT", &timeout)?;
    }
    if let Some(trust) = get("FOLIO_TRUST_FORWARDED") {
        config.source.trust_forwarded_headers = parse_bool("FOLIO_TRUST_FORWARDED", &trust)?;
    }

    Ok(config)
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, EnvConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| EnvConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, EnvConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(EnvConfigError {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn duration(var: &'static str, value: &str) -> Result<Duration, EnvConfigError> {
    parse_duration(value.trim()).map_err(|reason| EnvConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    })
}
