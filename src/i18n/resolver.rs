//! Locale resolution for a single request.
//!
//! First match wins:
//!
//! 1. explicit `lang` parameter (persisted to the session)
//! 2. locale stored in the session
//! 3. best match against `Accept-Language`
//! 4. the default locale

use super::negotiate::best_match;

/// Normalize a locale code: lower-case and drop the region (`en-US` -> `en`).
pub fn normalize(code: &str) -> String {
    let code = code.trim();
    let base = code.split(['-', '_']).next().unwrap_or(code);
    base.to_lowercase()
}

/// Where a resolved locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    /// Explicit request parameter.
    Query,
    /// Previously stored session value.
    Session,
    /// Accept-Language negotiation.
    AcceptLanguage,
    /// Nothing matched.
    Default,
}

/// Result of resolving a request's locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// A supported locale code.
    pub locale: String,
    /// Which tier produced it.
    pub source: LocaleSource,
}

impl Resolution {
    /// Whether the caller should store the locale in the session.
    pub fn should_persist(&self) -> bool {
        self.source == LocaleSource::Query
    }
}

/// Picks one supported locale per request.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    supported: Vec<String>,
    default_locale: String,
}

impl LocaleResolver {
    /// Create a resolver.
    ///
    /// Supported codes are normalized. If the default is not among them it
    /// is added, so resolution can never produce an unsupported code.
    pub fn new(supported: &[String], default_locale: &str) -> Self {
        let default_locale = normalize(default_locale);

        let mut codes: Vec<String> = Vec::with_capacity(supported.len() + 1);
        for code in supported.iter().map(|c| normalize(c)) {
            if !code.is_empty() && !codes.contains(&code) {
                codes.push(code);
            }
        }
        if !codes.contains(&default_locale) {
            codes.push(default_locale.clone());
        }

        Self {
            supported: codes,
            default_locale,
        }
    }

    /// Supported locale codes, in configured order.
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// Default locale code.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Normalize `code` and return it if supported.
    pub fn supported_code(&self, code: &str) -> Option<&str> {
        let code = normalize(code);
        self.supported
            .iter()
            .find(|s| **s == code)
            .map(|s| s.as_str())
    }

    /// Resolve the locale for a request.
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        session: Option<&str>,
        accept_language: Option<&str>,
    ) -> Resolution {
        if let Some(code) = explicit.and_then(|c| self.supported_code(c)) {
            return Resolution {
                locale: code.to_string(),
                source: LocaleSource::Query,
            };
        }

        if let Some(code) = session.and_then(|c| self.supported_code(c)) {
            return Resolution {
                locale: code.to_string(),
                source: LocaleSource::Session,
            };
        }

        if let Some(code) = accept_language.and_then(|h| best_match(h, &self.supported)) {
            return Resolution {
                locale: code.to_string(),
                source: LocaleSource::AcceptLanguage,
            };
        }

        Resolution {
            locale: self.default_locale.clone(),
            source: LocaleSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LocaleResolver {
        let supported: Vec<String> = ["en", "cs", "uk"].iter().map(|s| s.to_string()).collect();
        LocaleResolver::new(&supported, "en")
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("en-US"), "en");
        assert_eq!(normalize("CS"), "cs");
        assert_eq!(normalize("uk_UA"), "uk");
        assert_eq!(normalize("  Cs-cz "), "cs");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_query_variants_resolve_to_base_code() {
        let resolver = resolver();
        for (input, expected) in [
            ("en", "en"),
            ("EN", "en"),
            ("en-US", "en"),
            ("en_gb", "en"),
            ("cs", "cs"),
            ("cs-CZ", "cs"),
            ("Uk-UA", "uk"),
        ] {
            let res = resolver.resolve(Some(input), Some("uk"), Some("cs"));
            assert_eq!(res.locale, expected, "input {input}");
            assert_eq!(res.source, LocaleSource::Query);
            assert!(res.should_persist());
        }
    }

    #[test]
    fn test_unsupported_query_falls_back_to_session() {
        let res = resolver().resolve(Some("de"), Some("uk"), Some("cs"));
        assert_eq!(res.locale, "uk");
        assert_eq!(res.source, LocaleSource::Session);
        assert!(!res.should_persist());
    }

    #[test]
    fn test_absent_query_uses_session() {
        let res = resolver().resolve(None, Some("cs"), Some("uk"));
        assert_eq!(res.locale, "cs");
        assert_eq!(res.source, LocaleSource::Session);
    }

    #[test]
    fn test_unsupported_session_falls_back_to_accept_language() {
        let res = resolver().resolve(Some("xx"), Some("de"), Some("de;q=0.9, uk;q=0.8"));
        assert_eq!(res.locale, "uk");
        assert_eq!(res.source, LocaleSource::AcceptLanguage);
    }

    #[test]
    fn test_nothing_matches_uses_default() {
        let res = resolver().resolve(Some("fr"), Some("de"), Some("ja, zh;q=0.5"));
        assert_eq!(res.locale, "en");
        assert_eq!(res.source, LocaleSource::Default);

        let res = resolver().resolve(None, None, None);
        assert_eq!(res.locale, "en");
        assert_eq!(res.source, LocaleSource::Default);
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let res = resolver().resolve(Some(""), None, Some("cs"));
        assert_eq!(res.locale, "cs");
    }

    #[test]
    fn test_new_normalizes_and_adds_default() {
        let supported = vec!["CS".to_string(), "cs-CZ".to_string(), "uk".to_string()];
        let resolver = LocaleResolver::new(&supported, "EN");

        assert_eq!(resolver.supported(), &["cs", "uk", "en"]);
        assert_eq!(resolver.default_locale(), "en");
        assert_eq!(resolver.supported_code("en-AU"), Some("en"));
        assert_eq!(resolver.supported_code("de"), None);
    }
}
