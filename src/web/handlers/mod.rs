//! Request handlers and the state they share.

pub mod contact;
pub mod home;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::contact::ContactDispatcher;
use crate::i18n::{I18nManager, LocaleResolver, Resolution};
use crate::mail::{build_mailer, Mailer};
use crate::template::{TemplateEngine, TemplateError, TemplateLoader};
use crate::Result;

use super::session::{derive_key, Session};

pub use contact::{submit_contact, LangQuery};
pub use home::home;

/// Application state shared across handlers.
///
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub templates: Arc<TemplateEngine>,
    pub i18n: Arc<I18nManager>,
    pub resolver: Arc<LocaleResolver>,
    pub dispatcher: ContactDispatcher,
    key: Key,
}

impl AppState {
    /// Assemble state from already loaded parts.
    pub fn new(
        config: Config,
        templates: TemplateEngine,
        i18n: I18nManager,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let resolver = LocaleResolver::new(&config.locale.supported, &config.locale.default);
        let key = derive_key(&config.session.secret);

        Self {
            config: Arc::new(config),
            templates: Arc::new(templates),
            i18n: Arc::new(i18n),
            resolver: Arc::new(resolver),
            dispatcher: ContactDispatcher::new(mailer),
            key,
        }
    }

    /// Load templates and translations from disk and build the mail transport.
    pub fn from_config(config: Config) -> Result<Self> {
        let resolver = LocaleResolver::new(&config.locale.supported, &config.locale.default);
        let i18n = I18nManager::load_supported(
            &config.locale.path,
            resolver.supported(),
            resolver.default_locale(),
        )?;
        tracing::info!(locales = ?i18n.available_locales(), "Translations loaded");

        let templates = TemplateLoader::new(&config.templates.path).load_engine()?;
        if !templates.has_template(home::TEMPLATE) {
            return Err(TemplateError::NotFound(home::TEMPLATE.to_string()).into());
        }

        let mailer = build_mailer(&config.mail)?;
        if mailer.is_none() {
            tracing::warn!("No mail transport configured; contact submissions will fail");
        }

        Ok(Self::new(config, templates, i18n, mailer))
    }

    /// Resolve the locale for a request.
    pub fn resolve_locale(
        &self,
        explicit: Option<&str>,
        session: &Session,
        headers: &HeaderMap,
    ) -> Resolution {
        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        self.resolver
            .resolve(explicit, session.locale.as_deref(), accept_language)
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn secure_cookie(&self) -> bool {
        self.config.session.secure_cookie
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
