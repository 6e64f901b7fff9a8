//! Configuration module for folio.
//!
//! Configuration is read from a TOML file and then overridden from the
//! environment, so a deployment can keep credentials out of the file.

use serde::Deserialize;
use std::path::Path;

use crate::{FolioError, Result};

/// Session secret used when none is configured.
pub const DEV_SESSION_SECRET: &str = "dev-only-change-me";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Site information shown on the home page.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the portfolio owner.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
}

fn default_owner_name() -> String {
    "Mykola Shyshka".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Locale used when nothing else matches.
    #[serde(default = "default_locale")]
    pub default: String,
    /// Locales the site can be shown in.
    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,
    /// Path to the directory with `{code}.toml` translation files.
    #[serde(default = "default_locales_path")]
    pub path: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec!["en".to_string(), "cs".to_string(), "uk".to_string()]
}

fn default_locales_path() -> String {
    "locales".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            supported: default_supported_locales(),
            path: default_locales_path(),
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the templates directory.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie.
    #[serde(default = "default_session_secret")]
    pub secret: String,
    /// Mark the cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_session_secret() -> String {
    DEV_SESSION_SECRET.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: default_session_secret(),
            secure_cookie: false,
        }
    }
}

/// Which outbound mail transport to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportSetting {
    /// SendGrid when an API key is set, otherwise SMTP when credentials are set.
    #[default]
    Auto,
    /// Always use the SendGrid API.
    Sendgrid,
    /// Always use SMTP.
    Smtp,
    /// Keep messages in memory (local development).
    Memory,
}

/// SMTP transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP server port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user.
    #[serde(default)]
    pub user: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl SmtpConfig {
    /// Whether both login credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}

/// SendGrid API transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SendGridConfig {
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,
    /// Send endpoint.
    #[serde(default = "default_sendgrid_endpoint")]
    pub endpoint: String,
}

fn default_sendgrid_endpoint() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_sendgrid_endpoint(),
        }
    }
}

/// Contact mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Transport selection.
    #[serde(default)]
    pub transport: TransportSetting,
    /// Address that receives contact messages. Falls back to the SMTP user.
    #[serde(default)]
    pub recipient: String,
    /// Sender address. Falls back to the SMTP user (SMTP) or the recipient (API).
    #[serde(default)]
    pub sender: String,
    /// Display name of the sender.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// Timeout for one send attempt, in seconds.
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
    /// SMTP settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// SendGrid settings.
    #[serde(default)]
    pub sendgrid: SendGridConfig,
}

fn default_sender_name() -> String {
    "Portfolio Form".to_string()
}

fn default_mail_timeout() -> u64 {
    10
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: TransportSetting::default(),
            recipient: String::new(),
            sender: String::new(),
            sender_name: default_sender_name(),
            timeout_secs: default_mail_timeout(),
            smtp: SmtpConfig::default(),
            sendgrid: SendGridConfig::default(),
        }
    }
}

impl MailConfig {
    /// Effective recipient address.
    pub fn recipient(&self) -> Option<&str> {
        first_non_empty(&[&self.recipient, &self.smtp.user])
    }

    /// Effective sender address for SMTP delivery.
    pub fn smtp_sender(&self) -> Option<&str> {
        first_non_empty(&[&self.sender, &self.smtp.user])
    }

    /// Effective sender address for API delivery.
    pub fn api_sender(&self) -> Option<&str> {
        first_non_empty(&[&self.sender, &self.recipient, &self.smtp.user])
    }
}

fn first_non_empty<'a>(candidates: &[&'a String]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|s| s.as_str())
        .find(|s| !s.is_empty())
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether to serve static files under `/static`.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            serve_static: default_serve_static(),
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Locale configuration.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FolioError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FolioError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FOLIO_HOST`, `FOLIO_PORT`: listen address
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`: SMTP transport
    /// - `MAIL_TO`, `MAIL_FROM`: recipient and sender addresses
    /// - `SENDGRID_API_KEY`: API transport key
    /// - `SESSION_SECRET`: session cookie signing secret
    /// - `SUPPORTED_LOCALES`: comma-separated locale codes
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("FOLIO_PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }

        if let Some(host) = var("SMTP_HOST") {
            self.mail.smtp.host = host;
        }
        if let Some(port) = var("SMTP_PORT").and_then(|p| p.trim().parse().ok()) {
            self.mail.smtp.port = port;
        }
        if let Some(user) = var("SMTP_USER") {
            self.mail.smtp.user = user;
        }
        if let Some(password) = var("SMTP_PASS") {
            self.mail.smtp.password = password;
        }
        if let Some(to) = var("MAIL_TO") {
            self.mail.recipient = to;
        }
        if let Some(from) = var("MAIL_FROM") {
            self.mail.sender = from;
        }
        if let Some(key) = var("SENDGRID_API_KEY") {
            self.mail.sendgrid.api_key = key;
        }

        if let Some(secret) = var("SESSION_SECRET") {
            self.session.secret = secret;
        }
        if let Some(locales) = var("SUPPORTED_LOCALES") {
            self.locale.supported = locales
                .split(',')
                .map(|code| code.trim().to_lowercase())
                .filter(|code| !code.is_empty())
                .collect();
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - no supported locale is configured
    /// - the default locale is not one of the supported locales
    /// - the session secret is empty
    pub fn validate(&self) -> Result<()> {
        if self.locale.supported.is_empty() {
            return Err(FolioError::Config(
                "locale.supported must list at least one locale".to_string(),
            ));
        }
        if !self.locale.supported.contains(&self.locale.default) {
            return Err(FolioError::Config(format!(
                "default locale '{}' is not in locale.supported {:?}",
                self.locale.default, self.locale.supported
            )));
        }
        if self.session.secret.is_empty() {
            return Err(FolioError::Config(
                "session.secret is empty. Set it in config.toml or via SESSION_SECRET.".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the built-in development session secret is in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.session.secret == DEV_SESSION_SECRET
    }
}
