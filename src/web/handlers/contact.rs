//! Contact form submission.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::AppState;
use crate::contact::ContactSubmission;
use crate::web::error::WebError;
use crate::web::session::Session;

/// Where a successful submission lands.
pub const CONTACT_ANCHOR: &str = "/#contact";

/// Optional `?lang=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// POST /contact - Validate and relay a contact message.
///
/// On success the visitor is redirected back to the contact section with a
/// flash message in their language.
pub async fn submit_contact(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
    jar: SignedCookieJar,
    Form(submission): Form<ContactSubmission>,
) -> Result<(SignedCookieJar, Redirect), WebError> {
    state.dispatcher.dispatch(&submission).await?;

    let mut session = Session::from_jar(&jar);
    // an unsupported query value does not hide a supported form value
    let explicit = [query.lang.as_deref(), submission.lang.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|code| state.resolver.supported_code(code));
    let resolution = state.resolve_locale(explicit, &session, &headers);
    if resolution.should_persist() {
        session.locale = Some(resolution.locale.clone());
    }

    let i18n = state.i18n.get_or_default(&resolution.locale);
    session.flash("success", i18n.t("flash.sent"));

    Ok((
        session.store(jar, state.secure_cookie()),
        Redirect::to(CONTACT_ANCHOR),
    ))
}
