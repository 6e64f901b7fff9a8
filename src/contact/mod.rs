//! Contact form handling.
//!
//! A [`ContactSubmission`] is trimmed, validated in a fixed order and turned
//! into an [`OutboundMessage`]. The [`ContactDispatcher`] hands the message to
//! the configured mail transport.

mod dispatcher;

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::mail::OutboundMessage;

pub use dispatcher::{ContactDispatcher, DispatchError};

/// Maximum length of the visitor's name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of the visitor's email address, in characters.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Why a submission was rejected. The display text is shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// The hidden honeypot field was filled in.
    #[error("Bot detected")]
    Honeypot,

    /// Name, email or message is empty.
    #[error("Missing fields")]
    MissingFields,

    /// Name or email contains a line break.
    #[error("Invalid input")]
    LineBreak,

    /// A field is too long or the email is not an address.
    #[error("Invalid input")]
    Invalid,
}

/// Contact form payload.
///
/// `website` is the honeypot. `lang` is an optional locale hint sent by the
/// page that rendered the form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactSubmission {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub lang: Option<String>,
}

impl ContactSubmission {
    /// Copy of the submission with surrounding whitespace removed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            website: self.website.trim().to_string(),
            lang: self
                .lang
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        }
    }

    /// Run the checks in order; the first failure wins.
    ///
    /// Expects an already trimmed submission.
    pub fn check(&self) -> Result<(), ContactError> {
        if !self.website.is_empty() {
            return Err(ContactError::Honeypot);
        }

        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ContactError::MissingFields);
        }

        if has_line_break(&self.name) || has_line_break(&self.email) {
            return Err(ContactError::LineBreak);
        }

        self.validate().map_err(|_| ContactError::Invalid)
    }

    /// Build the message sent to the site owner.
    pub fn to_message(&self) -> OutboundMessage {
        OutboundMessage {
            subject: format!("Portfolio contact: {}", self.name),
            body: format!("From: {} <{}>\n\n{}", self.name, self.email, self.message),
            reply_to_email: self.email.clone(),
            reply_to_name: self.name.clone(),
        }
    }
}

/// Whether `value` contains `\r` or `\n`, which would split a mail header.
pub fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_submission() {
        assert_eq!(submission("Jane", "jane@x.com", "Hi").check(), Ok(()));
    }

    #[test]
    fn test_message_composition() {
        let message = submission("Jane", "jane@x.com", "Hi").to_message();

        assert_eq!(message.subject, "Portfolio contact: Jane");
        assert_eq!(message.body, "From: Jane <jane@x.com>\n\nHi");
        assert_eq!(message.reply_to_email, "jane@x.com");
        assert_eq!(message.reply_to_name, "Jane");
    }

    #[test]
    fn test_multiline_message_is_kept() {
        let message = submission("Jane", "jane@x.com", "line one\r\nline two");
        assert_eq!(message.check(), Ok(()));
        assert!(message.to_message().body.ends_with("line one\r\nline two"));
    }

    #[test]
    fn test_honeypot_wins_over_everything() {
        let mut bot = submission("", "", "");
        bot.website = "http://spam.example".to_string();
        assert_eq!(bot.check(), Err(ContactError::Honeypot));

        let mut bot = submission("Jane", "jane@x.com", "Hi");
        bot.website = "x".to_string();
        assert_eq!(bot.check(), Err(ContactError::Honeypot));
    }

    #[test]
    fn test_missing_fields() {
        for sub in [
            submission("", "jane@x.com", "Hi"),
            submission("Jane", "", "Hi"),
            submission("Jane", "jane@x.com", ""),
        ] {
            assert_eq!(sub.check(), Err(ContactError::MissingFields));
        }
    }

    #[test]
    fn test_missing_checked_before_line_breaks() {
        let sub = submission("Ja\nne", "", "Hi");
        assert_eq!(sub.check(), Err(ContactError::MissingFields));
    }

    #[test]
    fn test_line_breaks_in_header_fields() {
        for sub in [
            submission("Jane\r\nBcc: a@b.c", "jane@x.com", "Hi"),
            submission("Jane", "jane@x.com\nBcc: a@b.c", "Hi"),
            submission("Ja\rne", "jane@x.com", "Hi"),
        ] {
            let err = sub.check().unwrap_err();
            assert_eq!(err, ContactError::LineBreak);
            assert_eq!(err.to_string(), "Invalid input");
        }
    }

    #[test]
    fn test_limits_and_email_syntax() {
        let long_name = "n".repeat(MAX_NAME_LENGTH + 1);
        let long_message = "m".repeat(MAX_MESSAGE_LENGTH + 1);

        for sub in [
            submission(&long_name, "jane@x.com", "Hi"),
            submission("Jane", "not-an-address", "Hi"),
            submission("Jane", "jane@x.com", &long_message),
        ] {
            assert_eq!(sub.check(), Err(ContactError::Invalid));
        }

        let at_limit = "n".repeat(MAX_NAME_LENGTH);
        assert_eq!(submission(&at_limit, "jane@x.com", "Hi").check(), Ok(()));
    }

    #[test]
    fn test_has_line_break() {
        assert!(has_line_break("a\rb"));
        assert!(has_line_break("a\nb"));
        assert!(!has_line_break("Jane Doe\t"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ContactError::Honeypot.to_string(), "Bot detected");
        assert_eq!(ContactError::MissingFields.to_string(), "Missing fields");
        assert_eq!(ContactError::Invalid.to_string(), "Invalid input");
    }

    #[test]
    fn test_trimmed() {
        let mut sub = submission("  Jane ", "\tjane@x.com\n", "\n Hi \n");
        sub.website = "   ".to_string();
        sub.lang = Some("  ".to_string());

        let trimmed = sub.trimmed();
        assert_eq!(trimmed.name, "Jane");
        assert_eq!(trimmed.email, "jane@x.com");
        assert_eq!(trimmed.message, "Hi");
        assert_eq!(trimmed.website, "");
        assert_eq!(trimmed.lang, None);
        assert_eq!(trimmed.check(), Ok(()));
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let sub = submission("   ", "jane@x.com", "Hi").trimmed();
        assert_eq!(sub.check(), Err(ContactError::MissingFields));
    }

    #[test]
    fn test_deserialize_form_with_missing_fields() {
        let sub: ContactSubmission = serde_json::from_str(r#"{"name":"Jane"}"#).unwrap();
        assert_eq!(sub.name, "Jane");
        assert_eq!(sub.email, "");
        assert_eq!(sub.lang, None);
    }
}
