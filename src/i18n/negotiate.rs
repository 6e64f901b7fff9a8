//! Accept-Language parsing and best-match negotiation.

use super::resolver::normalize;

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Language tag as sent by the client (`en-US`, `*`).
    pub tag: String,
    /// Quality value in `0.0..=1.0`.
    pub quality: f32,
}

/// Parse an `Accept-Language` header into preferences, best first.
///
/// Entries with a malformed or out-of-range `q` are dropped, as are
/// entries with `q=0` (explicitly not acceptable). Ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut prefs: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                let (name, value) = param.split_once('=')?;
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse().ok()?;
                }
            }

            if !(quality > 0.0 && quality <= 1.0) {
                return None;
            }

            Some(LanguagePreference {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so equal qualities stay in header order
    prefs.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    prefs
}

/// Pick the supported locale that best matches the client's preferences.
///
/// `supported` must hold normalized codes. A `*` preference matches the
/// first supported locale.
pub fn best_match<'a>(header: &str, supported: &'a [String]) -> Option<&'a str> {
    for pref in parse_accept_language(header) {
        if pref.tag == "*" {
            return supported.first().map(|s| s.as_str());
        }

        let code = normalize(&pref.tag);
        if let Some(found) = supported.iter().find(|s| **s == code) {
            return Some(found.as_str());
        }
    }

    None
}
