//! Mailer: the single entry point for sending an email

use super::provider::MailTransport;
use super::ses::SesMailTransport;
use super::smtp::SmtpMailTransport;
use crate::config::MailerConfig;
use crate::domain::{MailMessage, TransportKind};
use crate::error::{DeliveryFailure, Result, TransportError};
use crate::telemetry;
use std::sync::Arc;
use validator::Validate;

/// Sends email through the transport chosen when it was built.
///
/// The transport never changes for the lifetime of a `Mailer`, and a failed
/// send is never retried or redirected to the other transport. Cloning is
/// cheap and clones share the same transport (and SES client).
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    /// Resolve the transport from configuration.
    ///
    /// SES wins when a non-empty region is configured and its client is built
    /// here, once. Otherwise the SMTP parameters are stored as-is and only
    /// checked when a message is sent.
    pub async fn from_config(config: &MailerConfig) -> Self {
        let kind = config.transport_kind();
        let transport: Arc<dyn MailTransport> = match kind {
            TransportKind::Ses => {
                let region = config.ses.active_region().unwrap_or_default();
                Arc::new(SesMailTransport::connect(region, &config.ses).await)
            }
            TransportKind::Smtp => Arc::new(SmtpMailTransport::from_params(config.smtp.clone())),
        };

        tracing::info!(transport = kind.as_str(), "Mailer transport resolved");

        Self { transport }
    }

    /// Create a mailer around an existing transport
    pub fn with_transport(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Name of the resolved transport ("smtp" or "ses" for built-in ones)
    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }

    /// Send one email.
    ///
    /// `Ok(())` means the transport accepted the message for delivery. Every
    /// failure is logged with its cause and returned as [`DeliveryFailure`].
    pub async fn send_mail(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
        reply_to: Option<&str>,
    ) -> Result<()> {
        let mut message = MailMessage::new(sender, recipient, subject, text);
        message.html_body = html.map(str::to_string);
        message.reply_to = reply_to.map(str::to_string);

        let transport_name = self.transport.transport_name();
        let outcome = self.dispatch(&message).await;
        telemetry::record_send(transport_name, outcome.is_ok());

        outcome.map_err(|e| {
            tracing::error!(
                transport = transport_name,
                recipient = %message.recipient,
                error = %e,
                "Unable to send email to the recipient"
            );
            DeliveryFailure::from(e)
        })
    }

    async fn dispatch(&self, message: &MailMessage) -> std::result::Result<(), TransportError> {
        message.validate()?;
        self.transport.deliver(message).await
    }
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}
