//! In-memory transport for tests and local development.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{MailError, Mailer, OutboundMessage};

/// Keeps every sent message in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: AtomicBool,
    attempts: AtomicUsize,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with an SMTP error.
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.set_failing(true);
        mailer
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Number of `send` calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[axum::async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Smtp("memory transport set to fail".to_string()));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| MailError::Smtp("memory transport poisoned".to_string()))?;
        sent.push(message.clone());

        tracing::debug!(subject = %message.subject, "Message stored in memory");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
