//! Cookie-backed session.
//!
//! The session is a small JSON document in a signed cookie. It holds the
//! visitor's chosen locale and pending flash messages.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "folio_session";

/// Derive the cookie signing key from the configured secret.
pub fn derive_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// One-shot message shown on the next page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

/// Session contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub flashes: Vec<Flash>,
}

impl Session {
    /// Read the session from the jar.
    ///
    /// A missing, tampered or unparsable cookie yields an empty session.
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    /// Queue a flash message.
    pub fn flash(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.flashes.push(Flash {
            category: category.into(),
            message: message.into(),
        });
    }

    /// Remove and return all pending flash messages.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn is_empty(&self) -> bool {
        self.locale.is_none() && self.flashes.is_empty()
    }

    /// Write the session back into the jar.
    ///
    /// An empty session removes the cookie, if there was one.
    pub fn store(&self, jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
        if self.is_empty() {
            if jar.get(SESSION_COOKIE).is_none() {
                return jar;
            }
            return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        }

        let value = match serde_json::to_string(self) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session");
                return jar;
            }
        };

        jar.add(
            Cookie::build((SESSION_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(secure),
        )
    }
}
