//! Error types for folio.

use thiserror::Error;

/// Common error type for folio.
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    ///
    /// Raised for unparsable config files and for values that fail
    /// `Config::validate`.
    #[error("configuration error: {0}")]
    Config(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Translation resource error.
    #[error("i18n error: {0}")]
    I18n(#[from] crate::i18n::I18nError),

    /// Outbound mail error.
    #[error("mail error: {0}")]
    Mail(#[from] crate::mail::MailError),
}

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;
