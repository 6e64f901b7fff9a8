//! Hands validated submissions to the mail transport.

use std::sync::Arc;

use thiserror::Error;

use super::{ContactError, ContactSubmission};
use crate::mail::{MailError, Mailer};

/// Outcome of a failed dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The submission failed validation and was never sent.
    #[error("{0}")]
    Rejected(#[from] ContactError),

    /// No mail transport is configured.
    #[error("mail transport not configured")]
    NotConfigured,

    /// The transport failed.
    #[error("mail transport failed: {0}")]
    Transport(#[from] MailError),
}

/// Validates contact submissions and forwards them to one transport.
#[derive(Clone)]
pub struct ContactDispatcher {
    mailer: Option<Arc<dyn Mailer>>,
}

impl ContactDispatcher {
    pub fn new(mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { mailer }
    }

    /// Whether a transport is available.
    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Validate the submission and make exactly one delivery attempt.
    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<(), DispatchError> {
        let submission = submission.trimmed();

        if let Err(e) = submission.check() {
            tracing::warn!(reason = %e, "Contact submission rejected");
            return Err(e.into());
        }

        let Some(mailer) = &self.mailer else {
            tracing::error!("Contact submission received but no mail transport is configured");
            return Err(DispatchError::NotConfigured);
        };

        let message = submission.to_message();
        match mailer.send(&message).await {
            Ok(()) => {
                tracing::info!(transport = mailer.name(), "Contact message sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(transport = mailer.name(), error = %e, "Contact message failed");
                Err(e.into())
            }
        }
    }
}
