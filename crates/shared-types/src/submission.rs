//! # Submission Entities
//!
//! The raw request as it arrives on the wire and the trimmed, validated form
//! handed on to the mail template.

use serde::{Deserialize, Deserializer, Serialize};

/// A contact form submission as sent by the browser.
///
/// Every field defaults to empty so a body that omits one (or sends `null`)
/// deserializes fine and is then rejected by validation as missing, not as
/// malformed JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
    /// Invisible to humans; bots tend to fill it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<String>,
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            honeypot: None,
        }
    }

    /// Set the honeypot field.
    pub fn with_honeypot(mut self, value: impl Into<String>) -> Self {
        self.honeypot = Some(value.into());
        self
    }

    /// True when the honeypot carries any content at all.
    pub fn honeypot_tripped(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Copy without the honeypot, as posted to the endpoint.
    pub fn without_honeypot(&self) -> Self {
        Self {
            honeypot: None,
            ..self.clone()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A submission that passed validation. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    name: String,
    email: String,
    message: String,
}

impl ValidSubmission {
    pub(crate) fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
