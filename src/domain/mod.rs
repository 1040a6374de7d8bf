//! Domain types shared by the mailer and its transports

pub mod email;

pub use email::{MailMessage, TransportKind};
