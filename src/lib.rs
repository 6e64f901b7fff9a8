//! folio - personal portfolio site
//!
//! A server-rendered, localized home page with a contact form that relays
//! visitor messages to the site owner over SMTP or the SendGrid API.

pub mod config;
pub mod contact;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod mail;
pub mod template;
pub mod web;

pub use config::Config;
pub use contact::{ContactDispatcher, ContactError, ContactSubmission, DispatchError};
pub use error::{FolioError, Result};
pub use i18n::{I18n, I18nManager, LocaleResolver};
pub use mail::{build_mailer, MailError, Mailer, OutboundMessage};
pub use web::{AppState, WebServer};
