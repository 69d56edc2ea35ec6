//! Notification email rendered for each accepted submission.

use chrono::{DateTime, Utc};
use shared_types::ValidSubmission;

const ACCENT: &str = "#ff6b35";

/// Rendered notification. The transport supplies From and To.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    /// Submitter's address, used as Reply-To
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl ContactEmail {
    /// Render the fixed template.
    pub fn compose(
        submission: &ValidSubmission,
        subject_prefix: &str,
        received_at: DateTime<Utc>,
    ) -> Self {
        let timestamp = received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let name = submission.name();
        let email = submission.email();
        let message = submission.message();

        let subject = format!("{}: {}", subject_prefix, single_line(name));

        let text_body = format!(
            "Name: {name}\nEmail: {email}\nTimestamp: {timestamp}\n\nMessage:\n{message}\n"
        );

        let html_body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: {ACCENT};">New Contact Form Submission</h2>
  <div style="background: #f5f5f5; padding: 20px; border-radius: 8px;">
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Timestamp:</strong> {timestamp}</p>
  </div>
  <div style="margin-top: 20px; padding: 20px; background: #fff; border-left: 4px solid {ACCENT};">
    <h3>Message:</h3>
    <p style="white-space: pre-wrap;">{message}</p>
  </div>
</div>
"#,
            name = escape_html(name),
            email = escape_html(email),
            message = escape_html(message),
        );

        Self {
            reply_to: email.to_string(),
            subject,
            text_body,
            html_body,
        }
    }
}

/// Header values must stay on one line.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
