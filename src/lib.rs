//! Mailer Core - transactional mail dispatch
//!
//! Sends a single email through either direct SMTP submission or the AWS SES
//! v2 API. The transport is chosen once, when the [`Mailer`] is built from a
//! [`MailerConfig`], and every failure reaches the caller as the same opaque
//! [`DeliveryFailure`].

pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod telemetry;

// Re-export commonly used types
pub use config::MailerConfig;
pub use email::Mailer;
pub use error::{DeliveryFailure, Result};
