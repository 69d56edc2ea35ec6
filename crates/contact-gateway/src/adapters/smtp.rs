//! SMTP relay mailer built on lettre.

use crate::domain::config::SmtpConfig;
use crate::domain::email::ContactEmail;
use crate::ports::{MailError, Mailer};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, warn};

/// Relay connection plus the addresses every notification uses.
struct Relay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Sends notifications through an authenticated SMTP relay.
///
/// Built without a relay when credentials are missing. The server still
/// starts; each submission then fails with a configuration error.
pub struct SmtpMailer {
    relay: Option<Relay>,
}

impl SmtpMailer {
    /// Build from config. Missing credentials yield an unconfigured mailer;
    /// malformed addresses or host are an error.
    ///
    /// Must be called inside a tokio runtime: the pooled transport spawns
    /// its connection reaper on build.
    pub fn from_config(config: &SmtpConfig, send_timeout: Duration) -> Result<Self, MailError> {
        let Some((username, password)) = config.credentials() else {
            warn!(
                host = %config.host,
                "SMTP credentials not configured; submissions will be refused"
            );
            return Ok(Self { relay: None });
        };

        let from: Mailbox = username.parse()?;
        let to: Mailbox = config.recipient().unwrap_or(username).parse()?;

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(send_timeout))
            .build();

        debug!(
            host = %config.host,
            port = config.port,
            secure = config.secure,
            "SMTP relay configured"
        );

        Ok(Self {
            relay: Some(Relay {
                transport,
                from,
                to,
            }),
        })
    }

    fn build_message(relay: &Relay, email: ContactEmail) -> Result<Message, MailError> {
        let reply_to: Mailbox = email.reply_to.parse()?;
        let message = Message::builder()
            .from(relay.from.clone())
            .to(relay.to.clone())
            .reply_to(reply_to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body,
                email.html_body,
            ))?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn is_configured(&self) -> bool {
        self.relay.is_some()
    }

    async fn send(&self, email: ContactEmail) -> Result<(), MailError> {
        let relay = self.relay.as_ref().ok_or(MailError::NotConfigured)?;
        let message = Self::build_message(relay, email)?;
        let response = relay.transport.send(message).await?;
        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}
