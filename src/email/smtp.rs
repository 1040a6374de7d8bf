//! SMTP mail transport implementation using lettre

use super::provider::MailTransport;
use crate::config::SmtpParams;
use crate::domain::MailMessage;
use crate::error::TransportError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    transport::stub::AsyncStubTransport,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::str::FromStr;

/// How the SMTP session is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plaintext session
    Normal,
    /// Implicit TLS from the first byte (SMTPS)
    Ssl,
    /// Plaintext upgraded with STARTTLS
    StartTls,
}

impl FromStr for SmtpSecurity {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "ssl" => Ok(Self::Ssl),
            "tls" => Ok(Self::StartTls),
            other => Err(TransportError::InvalidConfiguration(format!(
                "Unknown SMTP mode: {}",
                other
            ))),
        }
    }
}

/// Final submission step of the SMTP path.
///
/// Implemented by the raw connection parameters, which open a fresh session
/// per call, and by lettre's stub transport for tests.
#[async_trait]
pub trait SmtpSubmission: Send + Sync {
    async fn submit(&self, email: Message) -> Result<(), TransportError>;
}

#[async_trait]
impl SmtpSubmission for SmtpParams {
    async fn submit(&self, email: Message) -> Result<(), TransportError> {
        let transport = connect(self)?;

        transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| classify_smtp_error(e.to_string()))
    }
}

#[async_trait]
impl SmtpSubmission for AsyncStubTransport {
    async fn submit(&self, email: Message) -> Result<(), TransportError> {
        AsyncTransport::send(self, email)
            .await
            .map(|_| ())
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

/// Resolve raw parameters into a lettre transport
fn connect(params: &SmtpParams) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
    if params.host.trim().is_empty() {
        return Err(TransportError::InvalidConfiguration(
            "SMTP host is empty".to_string(),
        ));
    }

    let security: SmtpSecurity = params.mode.parse()?;

    let mut builder = match security {
        SmtpSecurity::Normal => {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(params.host.as_str())
        }
        SmtpSecurity::Ssl => AsyncSmtpTransport::<Tokio1Executor>::relay(&params.host)
            .map_err(|e| TransportError::InvalidConfiguration(e.to_string()))?,
        SmtpSecurity::StartTls => {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&params.host)
                .map_err(|e| TransportError::InvalidConfiguration(e.to_string()))?
        }
    }
    .port(params.port);

    if let (Some(login), Some(password)) = (&params.login, &params.password) {
        builder = builder.credentials(Credentials::new(login.clone(), password.clone()));
    }

    Ok(builder.build())
}

fn classify_smtp_error(error_msg: String) -> TransportError {
    if error_msg.contains("authentication") || error_msg.contains("AUTH") {
        TransportError::AuthenticationFailed(error_msg)
    } else if error_msg.contains("connection")
        || error_msg.contains("Connection")
        || error_msg.contains("timeout")
        || error_msg.contains("timed out")
    {
        TransportError::ConnectionError(error_msg)
    } else {
        TransportError::SendFailed(error_msg)
    }
}

fn parse_mailbox(address: &str, role: &str) -> Result<Mailbox, TransportError> {
    address.parse().map_err(|e| {
        TransportError::InvalidAddress(format!("Invalid {} address {:?}: {}", role, address, e))
    })
}

/// Build the MIME message for one [`MailMessage`].
///
/// A single UTF-8 `text/plain` part, or `multipart/alternative` with the HTML
/// part after the text part when a non-empty HTML body is given. An empty
/// reply-to address or HTML body counts as absent.
pub fn compose(message: &MailMessage) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&message.sender, "sender")?)
        .to(parse_mailbox(&message.recipient, "recipient")?)
        .subject(message.subject.as_str());

    let reply_to = message.reply_to.as_deref().filter(|s| !s.is_empty());
    if let Some(reply_to) = reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to, "reply-to")?);
    }

    let email = match message.html_body.as_deref().filter(|s| !s.is_empty()) {
        Some(html_body) => builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(message.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
        ),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body.clone()),
    };

    email.map_err(|e| TransportError::Composition(e.to_string()))
}

/// SMTP-based mail transport
pub struct SmtpMailTransport<S: SmtpSubmission = SmtpParams> {
    submission: S,
}

impl SmtpMailTransport<SmtpParams> {
    /// Create a transport that connects with the given parameters on each send.
    ///
    /// Nothing is validated here.
    pub fn from_params(params: SmtpParams) -> Self {
        Self { submission: params }
    }
}

impl<S: SmtpSubmission> SmtpMailTransport<S> {
    /// Create a transport with a custom submission step
    pub fn with_submission(submission: S) -> Self {
        Self { submission }
    }
}

#[async_trait]
impl<S: SmtpSubmission> MailTransport for SmtpMailTransport<S> {
    async fn deliver(&self, message: &MailMessage) -> Result<(), TransportError> {
        let email = compose(message)?;
        self.submission.submit(email).await
    }

    fn transport_name(&self) -> &'static str {
        "smtp"
    }
}
