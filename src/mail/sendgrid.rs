//! SendGrid v3 `mail/send` transport.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::{MailError, Mailer, OutboundMessage};
use crate::config::MailConfig;

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

/// Sends mail through the SendGrid HTTP API.
#[derive(Debug, Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    endpoint: String,
    recipient: String,
    sender: String,
    sender_name: String,
}

impl SendGridMailer {
    /// Create a mailer from the mail configuration.
    pub fn from_config(config: &MailConfig, timeout: Duration) -> Result<Self, MailError> {
        if config.sendgrid.api_key.is_empty() {
            return Err(MailError::MissingConfig("SENDGRID_API_KEY".to_string()));
        }
        let recipient = config
            .recipient()
            .ok_or_else(|| MailError::MissingConfig("MAIL_TO".to_string()))?;
        let sender = config
            .api_sender()
            .ok_or_else(|| MailError::MissingConfig("MAIL_FROM".to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.sendgrid.api_key.clone(),
            endpoint: config.sendgrid.endpoint.clone(),
            recipient: recipient.to_string(),
            sender: sender.to_string(),
            sender_name: config.sender_name.clone(),
        })
    }

    fn request_body<'a>(&'a self, message: &'a OutboundMessage) -> SendRequest<'a> {
        SendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &self.recipient,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.sender,
                name: Some(&self.sender_name),
            },
            reply_to: Address {
                email: &message.reply_to_email,
                name: Some(&message.reply_to_name),
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &message.body,
            }],
        }
    }
}

#[axum::async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(message))
            .send()
            .await
            .map_err(|e| MailError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
