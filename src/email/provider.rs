//! Mail transport trait

use crate::domain::MailMessage;
use crate::error::TransportError;
use async_trait::async_trait;

/// A delivery mechanism able to send one [`MailMessage`].
///
/// Each call performs at most one network operation and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Compose and submit the message
    async fn deliver(&self, message: &MailMessage) -> Result<(), TransportError>;

    /// Get the transport name
    fn transport_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_mail_transport() {
        let mut mock = MockMailTransport::new();

        mock.expect_transport_name().returning(|| "mock");
        mock.expect_deliver()
            .withf(|message| message.recipient == "b@y.com")
            .times(1)
            .returning(|_| Ok(()));

        assert_eq!(mock.transport_name(), "mock");

        let message = MailMessage::new("a@x.com", "b@y.com", "Reset", "Click here");
        assert!(mock.deliver(&message).await.is_ok());
    }
}
