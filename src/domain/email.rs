//! Mail message domain types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Delivery mechanism a mailer was resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Direct SMTP submission
    Smtp,
    /// AWS Simple Email Service v2 API
    Ses,
}

impl TransportKind {
    /// Get the transport type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Ses => "ses",
        }
    }
}

/// A single email to be sent.
///
/// Built fresh for every send and dropped once the transport returns.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MailMessage {
    #[validate(length(min = 1))]
    pub sender: String,

    #[validate(length(min = 1))]
    pub recipient: String,

    pub subject: String,

    pub text_body: String,

    pub html_body: Option<String>,

    pub reply_to: Option<String>,
}

impl MailMessage {
    /// Create a plain-text message with no HTML body and no reply-to address
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
            reply_to: None,
        }
    }

    /// Add an HTML alternative to the text body
    pub fn with_html_body(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    /// Set the address replies should go to
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}
