//! AWS SES mail transport implementation
//!
//! Sends through the SES v2 `SendEmail` API. The request is first composed into
//! a plain [`SesSendRequest`] and then handed to an [`SesApi`] implementation,
//! which for production is the SDK [`Client`].

use super::provider::MailTransport;
use crate::config::SesSettings;
use crate::domain::MailMessage;
use crate::error::TransportError;
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_sdk_sesv2::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    types::{Body, Content, Destination, EmailContent, Message},
    Client,
};

/// Character set used for the subject and every body part
pub const CHARSET: &str = "UTF-8";

/// Text content with its character set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SesContent {
    pub data: String,
    pub charset: String,
}

impl SesContent {
    fn utf8(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            charset: CHARSET.to_string(),
        }
    }
}

/// A composed SES send-email request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SesSendRequest {
    pub from_email_address: String,
    pub to_addresses: Vec<String>,
    pub subject: SesContent,
    pub text: SesContent,
    pub html: Option<SesContent>,
    /// Omitted from the request entirely when `None`
    pub reply_to_addresses: Option<Vec<String>>,
}

/// Build the SES request for one [`MailMessage`]
pub fn compose(message: &MailMessage) -> SesSendRequest {
    SesSendRequest {
        from_email_address: message.sender.clone(),
        to_addresses: vec![message.recipient.clone()],
        subject: SesContent::utf8(message.subject.as_str()),
        text: SesContent::utf8(message.text_body.as_str()),
        html: message.html_body.as_deref().map(SesContent::utf8),
        reply_to_addresses: message.reply_to.clone().map(|addr| vec![addr]),
    }
}

/// The provider's send operation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SesApi: Send + Sync {
    /// Send the request, returning the provider message id if any
    async fn submit(&self, request: SesSendRequest) -> Result<Option<String>, TransportError>;
}

fn build_content(content: SesContent) -> Result<Content, TransportError> {
    Content::builder()
        .data(content.data)
        .charset(content.charset)
        .build()
        .map_err(|e| TransportError::Composition(e.to_string()))
}

fn classify_ses_error(error_msg: String) -> TransportError {
    if error_msg.contains("AccessDenied")
        || error_msg.contains("InvalidClientTokenId")
        || error_msg.contains("SignatureDoesNotMatch")
        || error_msg.contains("UnrecognizedClient")
    {
        TransportError::AuthenticationFailed(error_msg)
    } else if error_msg.contains("Throttling")
        || error_msg.contains("TooManyRequests")
        || error_msg.contains("rate")
    {
        TransportError::RateLimited(error_msg)
    } else if error_msg.contains("dispatch failure")
        || error_msg.contains("connection")
        || error_msg.contains("timeout")
    {
        TransportError::ConnectionError(error_msg)
    } else {
        TransportError::SendFailed(error_msg)
    }
}

#[async_trait]
impl SesApi for Client {
    async fn submit(&self, request: SesSendRequest) -> Result<Option<String>, TransportError> {
        let destination = Destination::builder()
            .set_to_addresses(Some(request.to_addresses))
            .build();

        let mut body_builder = Body::builder().text(build_content(request.text)?);
        if let Some(html) = request.html {
            body_builder = body_builder.html(build_content(html)?);
        }

        let ses_message = Message::builder()
            .subject(build_content(request.subject)?)
            .body(body_builder.build())
            .build();

        let email_content = EmailContent::builder().simple(ses_message).build();

        let response = self
            .send_email()
            .from_email_address(request.from_email_address)
            .destination(destination)
            .content(email_content)
            .set_reply_to_addresses(request.reply_to_addresses)
            .send()
            .await
            .map_err(|e| classify_ses_error(DisplayErrorContext(&e).to_string()))?;

        Ok(response.message_id)
    }
}

/// AWS SES mail transport
///
/// Holds one SDK client for the lifetime of the mailer. Supports:
/// - Explicit access key credentials
/// - The default credential chain (IAM role, env vars, profiles)
/// - An endpoint override
pub struct SesMailTransport<C: SesApi = Client> {
    client: C,
}

impl SesMailTransport<Client> {
    /// Build the SDK client for `region`.
    ///
    /// This is an async operation because the AWS SDK loads credentials.
    /// Retries are disabled so every send is attempted at most once.
    pub async fn connect(region: &str, settings: &SesSettings) -> Self {
        let mut loader = aws_config::from_env()
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled());

        if let Some((access_key, secret_key)) = settings.static_credentials() {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiration
                "mailer-core-ses",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint_url) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.as_str());
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

impl<C: SesApi> SesMailTransport<C> {
    /// Create a transport around an existing client
    pub fn with_client(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: SesApi> MailTransport for SesMailTransport<C> {
    async fn deliver(&self, message: &MailMessage) -> Result<(), TransportError> {
        let request = compose(message);
        let message_id = self.client.submit(request).await?;
        tracing::debug!(message_id = ?message_id, "SES accepted message");
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "ses"
    }
}
