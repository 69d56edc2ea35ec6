//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener configuration
    pub http: HttpConfig,
    /// Per-source rate limiting
    pub rate_limit: RateLimitConfig,
    /// Outbound mail account
    pub smtp: SmtpConfig,
    /// Timeouts
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// How the source identifier is resolved
    pub source: SourceConfig,
    /// Request limits
    pub limits: LimitsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.http.contact_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "contact_path must start with '/': {}",
                self.http.contact_path
            )));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "max_requests cannot be 0".into(),
            ));
        }

        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::InvalidRateLimit("window cannot be 0".into()));
        }

        if self.rate_limit.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidRateLimit(
                "sweep_interval cannot be 0".into(),
            ));
        }

        if self.timeouts.send.is_zero() {
            return Err(ConfigError::InvalidTimeout("send timeout cannot be 0".into()));
        }

        if self.timeouts.request < self.timeouts.send {
            return Err(ConfigError::InvalidTimeout(
                "request timeout must not be shorter than send timeout".into(),
            ));
        }

        if self.limits.max_body_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_size cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3001)
    pub port: u16,
    /// Path of the contact endpoint
    pub contact_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3001,
            contact_path: "/api/contact".to_string(),
        }
    }
}

/// Fixed-window rate limiting per source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Attempts allowed per source within one window
    pub max_requests: u32,
    /// Window length
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// How often stale records are swept
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 5,
            window: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// SMTP account used to relay submissions.
///
/// The password is never serialized and is redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,
    /// Relay port (587 for STARTTLS, 465 for implicit TLS)
    pub port: u16,
    /// Implicit TLS instead of STARTTLS
    pub secure: bool,
    /// Account identifier, also used as the From address
    pub username: Option<String>,
    /// Application password
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Inbox that receives submissions (defaults to the account)
    pub recipient: Option<String>,
    /// Subject line prefix
    pub subject_prefix: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            secure: false,
            username: None,
            password: None,
            recipient: None,
            subject_prefix: "Portfolio Contact".to_string(),
        }
    }
}

impl SmtpConfig {
    /// Account and password, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.trim().is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }

    /// Where submissions are delivered.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .or_else(|| self.username.as_deref())
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .field("subject_prefix", &self.subject_prefix)
            .finish()
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on one mail send
    #[serde(with = "humantime_serde")]
    pub send: Duration,
    /// Upper bound on a whole request
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            send: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed request headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache, in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "OPTIONS", "PATCH", "DELETE", "POST", "PUT"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: [
                "X-CSRF-Token",
                "X-Requested-With",
                "Accept",
                "Accept-Version",
                "Content-Length",
                "Content-MD5",
                "Content-Type",
                "Date",
                "X-Api-Version",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            max_age: 86400, // 24 hours
        }
    }
}

/// Source identifier resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Take the client address from X-Forwarded-For / X-Real-IP.
    /// Only safe behind a proxy that overwrites these headers; off by
    /// default so a direct client is keyed on its TCP peer address.
    pub trust_forwarded_headers: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            trust_forwarded_headers: false,
        }
    }
}

/// Request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB)
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid rate limiting configuration
    #[error("invalid rate limit: {0}")]
    InvalidRateLimit(String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Parse a human duration: `250ms`, `15s`, `5m`, `1h`, or plain seconds.
pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| "invalid milliseconds")
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| "invalid seconds")
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins = mins.trim().parse::<u64>().map_err(|_| "invalid minutes")?;
        mins.checked_mul(60)
            .map(Duration::from_secs)
            .ok_or("minutes out of range")
    } else if let Some(hours) = s.strip_suffix('h') {
        let hours = hours.trim().parse::<u64>().map_err(|_| "invalid hours")?;
        hours
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or("hours out of range")
    } else {
        s.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| "invalid duration format")
    }
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() != 0 {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        } else {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
