//! Error types for mail dispatch

use thiserror::Error;

/// Result type returned by [`crate::Mailer::send_mail`]
pub type Result<T> = std::result::Result<T, DeliveryFailure>;

/// Failure raised inside a transport while composing or submitting a message.
///
/// These never reach callers of the mailer directly; they are logged and then
/// folded into [`DeliveryFailure`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Message composition failed: {0}")]
    Composition(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// The single error surfaced to callers when an email could not be sent.
///
/// The display text is the same for every cause. The underlying
/// [`TransportError`] is only reachable through [`std::error::Error::source`].
#[derive(Error, Debug)]
#[error("Unable to send email to the recipient")]
pub struct DeliveryFailure {
    #[source]
    source: TransportError,
}

impl From<TransportError> for DeliveryFailure {
    fn from(source: TransportError) -> Self {
        Self { source }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for TransportError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TransportError::InvalidAddress(errors.to_string())
    }
}
