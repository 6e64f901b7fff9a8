//! Test helpers for the web integration tests.
//!
//! Builds an [`AppState`] from the repository's own `templates/` and
//! `locales/` directories so the tests exercise the shipped pages.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::{TestServer, TestServerConfig};
use folio::config::Config;
use folio::i18n::{I18nManager, LocaleResolver};
use folio::mail::{Mailer, MemoryMailer};
use folio::template::TemplateLoader;
use folio::web::{create_router, AppState};

/// Message shown after a successful English submission.
pub const SENT_EN: &str = "Thanks! Your message has been sent.";

/// Absolute path of a file or directory in the repository.
pub fn project_path(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(relative)
        .to_string_lossy()
        .into_owned()
}

/// Configuration pointing at the repository's assets.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.locale.path = project_path("locales");
    config.templates.path = project_path("templates");
    config.web.static_path = project_path("static");
    config.session.secret = "test-secret-key-for-testing-only".to_string();
    config
}

/// Build state from a configuration with an explicit mail transport.
pub fn create_state(config: Config, mailer: Option<Arc<dyn Mailer>>) -> AppState {
    let resolver = LocaleResolver::new(&config.locale.supported, &config.locale.default);
    let i18n = I18nManager::load_supported(
        &config.locale.path,
        resolver.supported(),
        resolver.default_locale(),
    )
    .expect("Failed to load translations");
    let templates = TemplateLoader::new(&config.templates.path)
        .load_engine()
        .expect("Failed to load templates");

    AppState::new(config, templates, i18n, mailer)
}

/// Test server that keeps cookies between requests, like a browser.
pub fn create_test_server_with(config: Config, mailer: Option<Arc<dyn Mailer>>) -> TestServer {
    let router = create_router(create_state(config, mailer));
    let server_config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };

    TestServer::new_with_config(router, server_config).expect("Failed to create test server")
}

/// Test server backed by an in-memory mail transport.
pub fn create_test_server() -> (TestServer, Arc<MemoryMailer>) {
    let memory = Arc::new(MemoryMailer::new());
    let server = create_test_server_with(create_test_config(), Some(memory.clone()));
    (server, memory)
}

/// A form that passes validation.
pub fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane"),
        ("email", "jane@x.com"),
        ("message", "Hi"),
        ("website", ""),
    ]
}
