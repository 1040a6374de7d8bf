//! Email sending functionality
//!
//! A [`Mailer`] dispatches through exactly one transport:
//! - SMTP (using lettre)
//! - AWS SES v2

pub mod mailer;
pub mod provider;
pub mod ses;
pub mod smtp;

pub use mailer::Mailer;
pub use provider::MailTransport;
pub use ses::{SesApi, SesContent, SesMailTransport, SesSendRequest};
pub use smtp::{SmtpMailTransport, SmtpSecurity, SmtpSubmission};
