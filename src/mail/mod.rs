//! Outbound mail for folio.
//!
//! Contact messages leave the site through exactly one [`Mailer`]:
//!
//! | Transport | Type | Selected when |
//! |-----------|------|---------------|
//! | SendGrid v3 API | [`SendGridMailer`] | an API key is configured |
//! | SMTP (STARTTLS) | [`SmtpMailer`] | SMTP user and password are configured |
//! | In-memory | [`MemoryMailer`] | `mail.transport = "memory"` |
//!
//! Each send is a single attempt bounded by the configured timeout.

mod memory;
mod sendgrid;
mod smtp;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::{MailConfig, TransportSetting};

pub use memory::MemoryMailer;
pub use sendgrid::SendGridMailer;
pub use smtp::SmtpMailer;

/// Mail delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("mail API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// A message ready to hand to a transport.
///
/// Recipient and sender come from the transport's configuration; the
/// message only carries what depends on the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
    pub reply_to_email: String,
    pub reply_to_name: String,
}

/// An outbound mail transport.
#[axum::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. No retries.
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError>;

    /// Short transport name for logs.
    fn name(&self) -> &'static str;
}

/// Build the transport selected by the configuration.
///
/// Returns `Ok(None)` when `transport = "auto"` and neither an API key nor
/// SMTP credentials are present.
pub fn build_mailer(config: &MailConfig) -> Result<Option<Arc<dyn Mailer>>, MailError> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    let mailer: Arc<dyn Mailer> = match config.transport {
        TransportSetting::Sendgrid => Arc::new(SendGridMailer::from_config(config, timeout)?),
        TransportSetting::Smtp => Arc::new(SmtpMailer::from_config(config, timeout)?),
        TransportSetting::Memory => Arc::new(MemoryMailer::new()),
        TransportSetting::Auto => {
            if !config.sendgrid.api_key.is_empty() {
                Arc::new(SendGridMailer::from_config(config, timeout)?)
            } else if config.smtp.has_credentials() {
                Arc::new(SmtpMailer::from_config(config, timeout)?)
            } else {
                return Ok(None);
            }
        }
    };

    tracing::info!(transport = mailer.name(), "Mail transport configured");
    Ok(Some(mailer))
}
