//! SMTP transport over STARTTLS.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer, OutboundMessage};
use crate::config::MailConfig;

/// Sends mail through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer from the mail configuration.
    pub fn from_config(config: &MailConfig, timeout: Duration) -> Result<Self, MailError> {
        let smtp = &config.smtp;
        if !smtp.has_credentials() {
            return Err(MailError::MissingConfig("SMTP_USER/SMTP_PASS".to_string()));
        }

        let from_addr = config
            .smtp_sender()
            .ok_or_else(|| MailError::MissingConfig("MAIL_FROM".to_string()))?;
        let to_addr = config
            .recipient()
            .ok_or_else(|| MailError::MissingConfig("MAIL_TO".to_string()))?;

        let from = Mailbox::new(Some(config.sender_name.clone()), parse_address(from_addr)?);
        let to = Mailbox::new(None, parse_address(to_addr)?);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, from, to })
    }

    fn build_message(&self, message: &OutboundMessage) -> Result<Message, MailError> {
        let reply_to = Mailbox::new(
            Some(message.reply_to_name.clone()),
            parse_address(&message.reply_to_email)?,
        );

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_address(addr: &str) -> Result<Address, MailError> {
    addr.parse::<Address>()
        .map_err(|_| MailError::InvalidAddress(addr.to_string()))
}

#[axum::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        let email = self.build_message(message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> MailConfig {
        let mut config = MailConfig::default();
        config.smtp.user = "me@gmail.com".to_string();
        config.smtp.password = "app-password".to_string();
        config
    }

    fn message() -> OutboundMessage {
        OutboundMessage {
            subject: "Portfolio contact: Jane".to_string(),
            body: "From: Jane <jane@x.com>\n\nHi".to_string(),
            reply_to_email: "jane@x.com".to_string(),
            reply_to_name: "Jane".to_string(),
        }
    }

    #[tokio::test]
    async fn test_defaults_to_smtp_user_for_both_ends() {
        let mailer = SmtpMailer::from_config(&smtp_config(), Duration::from_secs(10)).unwrap();

        assert_eq!(mailer.from.email.to_string(), "me@gmail.com");
        assert_eq!(mailer.to.email.to_string(), "me@gmail.com");
    }

    #[tokio::test]
    async fn test_build_message_headers() {
        let mut config = smtp_config();
        config.recipient = "owner@example.com".to_string();
        let mailer = SmtpMailer::from_config(&config, Duration::from_secs(10)).unwrap();

        let email = mailer.build_message(&message()).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Reply-To: Jane <jane@x.com>"));
        assert!(raw.contains("Subject: Portfolio contact: Jane"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn test_invalid_reply_to() {
        let mailer = SmtpMailer::from_config(&smtp_config(), Duration::from_secs(10)).unwrap();
        let mut bad = message();
        bad.reply_to_email = "not an address".to_string();

        assert!(matches!(
            mailer.build_message(&bad),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_smtp_error() {
        let mut config = smtp_config();
        config.smtp.host = "127.0.0.1".to_string();
        config.smtp.port = 1;
        let mailer = SmtpMailer::from_config(&config, Duration::from_secs(2)).unwrap();

        let result = mailer.send(&message()).await;
        assert!(matches!(result, Err(MailError::Smtp(_))), "{result:?}");
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = smtp_config();
        config.smtp.password.clear();

        let result = SmtpMailer::from_config(&config, Duration::from_secs(10));
        assert!(matches!(result, Err(MailError::MissingConfig(_))));
    }

    #[test]
    fn test_invalid_recipient() {
        let mut config = smtp_config();
        config.recipient = "owner-at-example".to_string();

        let result = SmtpMailer::from_config(&config, Duration::from_secs(10));
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }
}
