//! Home page.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum_extra::extract::cookie::SignedCookieJar;

use super::{AppState, LangQuery};
use crate::contact::{MAX_EMAIL_LENGTH, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH};
use crate::template::{TemplateContext, TemplateError, Value};
use crate::web::error::WebError;
use crate::web::session::{Flash, Session};

/// Name of the home page template.
pub const TEMPLATE: &str = "index";

/// GET / - Render the home page.
///
/// A supported `?lang=` is remembered in the session. Pending flash
/// messages are shown once and dropped.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), WebError> {
    let mut session = Session::from_jar(&jar);

    let resolution = state.resolve_locale(query.lang.as_deref(), &session, &headers);
    if resolution.should_persist() {
        session.locale = Some(resolution.locale.clone());
    }

    let flashes = session.take_flashes();
    let html = render_home(&state, &resolution.locale, &flashes)?;

    Ok((session.store(jar, state.secure_cookie()), Html(html)))
}

fn render_home(state: &AppState, locale: &str, flashes: &[Flash]) -> Result<String, TemplateError> {
    let mut context = TemplateContext::new(state.i18n.get_or_default(locale));

    context.set("name", state.config.site.owner_name.as_str());
    context.set("current_locale", locale);
    context.set("year", chrono::Utc::now().format("%Y").to_string());
    context.set(
        "limits",
        Value::object([
            ("name", Value::Number(MAX_NAME_LENGTH as i64)),
            ("email", Value::Number(MAX_EMAIL_LENGTH as i64)),
            ("message", Value::Number(MAX_MESSAGE_LENGTH as i64)),
        ]),
    );

    let locales: Vec<Value> = state
        .resolver
        .supported()
        .iter()
        .map(|code| {
            let native_name = state.i18n.get_or_default(code).t("meta.name").to_string();
            Value::object([
                ("code", Value::string(code.as_str())),
                ("name", Value::string(native_name)),
                ("active", Value::Bool(code == locale)),
            ])
        })
        .collect();
    context.set("locales", Value::List(locales));

    let flashes: Vec<Value> = flashes
        .iter()
        .map(|flash| {
            Value::object([
                ("category", Value::string(flash.category.as_str())),
                ("message", Value::string(flash.message.as_str())),
            ])
        })
        .collect();
    context.set("flashes", Value::List(flashes));

    state.templates.render(TEMPLATE, &context)
}
