//! Internationalization (i18n) module for folio.
//!
//! Translations live in one TOML file per locale (`locales/en.toml`,
//! `locales/cs.toml`, ...). Nested tables are flattened into dot-separated
//! keys, so `[contact] title = "..."` is looked up as `contact.title`.
//!
//! Picking *which* locale a request is served in is the job of
//! [`LocaleResolver`].
//!
//! ```
//! use folio::i18n::I18n;
//!
//! let i18n = I18n::parse("cs", r#"
//! [flash]
//! sent = "Díky, {{name}}!"
//! "#).unwrap();
//!
//! assert_eq!(i18n.t_with("flash.sent", &[("name", "Jano")]), "Díky, Jano!");
//! ```

mod negotiate;
mod resolver;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub use negotiate::{best_match, parse_accept_language, LanguagePreference};
pub use resolver::{normalize, LocaleResolver, LocaleSource, Resolution};

/// Locale used when nothing is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// I18n-related errors.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to read locale file.
    #[error("Failed to read locale file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse locale file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Locale not found.
    #[error("Locale not found: {0}")]
    LocaleNotFound(String),
}

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Translations for a single locale.
#[derive(Debug, Clone)]
pub struct I18n {
    locale: String,
    messages: HashMap<String, String>,
}

impl I18n {
    /// Load `{locale}.toml` from `locales_dir`.
    pub fn load<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let path = locales_dir.as_ref().join(format!("{locale}.toml"));

        if !path.exists() {
            return Err(I18nError::LocaleNotFound(locale.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(locale, &content)
    }

    /// Parse translations from a TOML string.
    pub fn parse(locale: &str, content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;

        let mut messages = HashMap::new();
        flatten_toml("", &table, &mut messages);

        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    /// Create an instance without messages; every key translates to itself.
    pub fn empty(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Locale code of these translations.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Number of loaded messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if no messages are loaded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Translate a key. Unknown keys are returned unchanged.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(|s| s.as_str()).unwrap_or(key)
    }

    /// Translate a key and substitute `{{name}}` placeholders.
    ///
    /// Placeholders without a matching parameter are left as they are.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut result = self.t(key).to_string();

        for (name, value) in params {
            let placeholder = format!("{{{{{name}}}}}");
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Check if a translation key exists.
    pub fn has_key(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Copy of these translations where missing keys come from `fallback`.
    pub fn with_fallback(&self, fallback: &I18n) -> I18n {
        let mut messages = fallback.messages.clone();
        messages.extend(
            self.messages
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        I18n {
            locale: self.locale.clone(),
            messages,
        }
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::empty(DEFAULT_LOCALE)
    }
}

/// Flatten nested tables into dot-separated keys. Arrays are skipped.
fn flatten_toml(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let text = match value {
            toml::Value::Table(nested) => {
                flatten_toml(&path, nested, out);
                continue;
            }
            toml::Value::Array(_) => continue,
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
        };
        out.insert(path, text);
    }
}

/// Translations for every supported locale.
///
/// Immutable after startup; handlers pick an entry per request.
#[derive(Debug, Clone)]
pub struct I18nManager {
    locales: HashMap<String, Arc<I18n>>,
    default_locale: String,
}

impl I18nManager {
    /// Create an empty manager.
    pub fn new(default_locale: &str) -> Self {
        Self {
            locales: HashMap::new(),
            default_locale: default_locale.to_string(),
        }
    }

    /// Load the translation file of every supported locale.
    ///
    /// The default locale's file must exist. Other locales fall back to the
    /// default locale's text for keys they do not define; a missing file
    /// only produces a warning.
    pub fn load_supported<P: AsRef<Path>>(
        locales_dir: P,
        supported: &[String],
        default_locale: &str,
    ) -> Result<Self> {
        let dir = locales_dir.as_ref();
        let base = I18n::load(default_locale, dir)?;

        let mut manager = Self::new(default_locale);
        for code in supported {
            if code == default_locale {
                continue;
            }
            match I18n::load(code, dir) {
                Ok(i18n) => manager.add_locale(i18n.with_fallback(&base)),
                Err(I18nError::LocaleNotFound(_)) => {
                    tracing::warn!(locale = %code, "No translation file, using default locale text");
                    manager.add_locale(I18n::empty(code).with_fallback(&base));
                }
                Err(e) => return Err(e),
            }
        }
        manager.add_locale(base);

        Ok(manager)
    }

    /// Add (or replace) a locale.
    pub fn add_locale(&mut self, i18n: I18n) {
        let locale = i18n.locale().to_string();
        self.locales.insert(locale, Arc::new(i18n));
    }

    /// Default locale code.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Sorted list of loaded locale codes.
    pub fn available_locales(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(|s| s.as_str()).collect();
        codes.sort_unstable();
        codes
    }

    /// Translations for a locale, if loaded.
    pub fn get(&self, locale: &str) -> Option<Arc<I18n>> {
        self.locales.get(locale).cloned()
    }

    /// Translations for a locale, falling back to the default locale.
    pub fn get_or_default(&self, locale: &str) -> Arc<I18n> {
        self.get(locale)
            .or_else(|| self.get(&self.default_locale))
            .unwrap_or_else(|| Arc::new(I18n::empty(locale)))
    }
}

impl Default for I18nManager {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}
