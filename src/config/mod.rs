//! Configuration management for the mailer
//!
//! This is the only place that reads process environment. The resulting
//! [`MailerConfig`] is handed to [`crate::Mailer::from_config`].

use crate::domain::TransportKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Mailer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailerConfig {
    /// SMTP connection parameters, used when SES is not configured
    #[serde(default)]
    pub smtp: SmtpParams,
    /// AWS SES settings, take precedence when a region is set
    #[serde(default)]
    pub ses: SesSettings,
}

/// SMTP connection parameters.
///
/// Kept as given; they are resolved and checked when a message is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpParams {
    /// SMTP server host
    pub host: String,

    /// SMTP server port (typically 25, 465 for implicit TLS, 587 for STARTTLS)
    pub port: u16,

    /// Security mode: "normal", "ssl" or "tls"
    pub mode: String,

    /// Username for authentication (optional)
    pub login: Option<String>,

    /// Password for authentication (optional)
    pub password: Option<String>,
}

impl Default for SmtpParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            mode: "normal".to_string(),
            login: None,
            password: None,
        }
    }
}

/// AWS SES settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SesSettings {
    /// AWS region (e.g., "us-east-1"); SES is used only when this is non-empty
    pub region: Option<String>,

    /// AWS access key ID (optional - uses the default credential chain if not provided)
    pub access_key_id: Option<String>,

    /// AWS secret access key
    pub secret_access_key: Option<String>,

    /// Endpoint override (LocalStack and similar)
    pub endpoint_url: Option<String>,
}

impl SesSettings {
    /// Region to use, if SES is configured
    pub fn active_region(&self) -> Option<&str> {
        self.region.as_deref().filter(|region| !region.is_empty())
    }

    /// Explicit key pair, only when both halves are present
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.access_key_id.as_deref(),
            self.secret_access_key.as_deref(),
        ) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key, secret))
            }
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log output format: "text" or "json"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        }
    }
}

impl MailerConfig {
    /// Load `.env` (if any) and then read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SmtpParams::default();

        let port = match lookup("MAILER_SMTP_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("Invalid MAILER_SMTP_PORT: {}", value))?,
            None => defaults.port,
        };

        Ok(Self {
            smtp: SmtpParams {
                host: lookup("MAILER_SMTP_HOST").unwrap_or(defaults.host),
                port,
                mode: lookup("MAILER_SMTP_MODE").unwrap_or(defaults.mode),
                login: lookup("MAILER_SMTP_LOGIN"),
                password: lookup("MAILER_SMTP_PASSWORD"),
            },
            ses: SesSettings {
                region: lookup("MAILER_SES_REGION"),
                access_key_id: lookup("MAILER_SES_ACCESS_KEY"),
                secret_access_key: lookup("MAILER_SES_SECRET_KEY"),
                endpoint_url: lookup("MAILER_SES_ENDPOINT_URL"),
            },
        })
    }

    /// Transport a mailer built from this configuration will use
    pub fn transport_kind(&self) -> TransportKind {
        if self.ses.active_region().is_some() {
            TransportKind::Ses
        } else {
            TransportKind::Smtp
        }
    }
}
