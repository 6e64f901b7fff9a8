//! Security headers middleware.

use axum::{
    body::Body,
    http::{
        header::{self, HeaderName, HeaderValue},
        Request,
    },
    middleware::Next,
    response::Response,
};

/// Headers set on every response, replacing any handler value.
const FIXED_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    // disables the legacy XSS auditor
    (header::X_XSS_PROTECTION, "0"),
];

/// Security headers middleware.
///
/// Adds `X-Content-Type-Options`, `X-Frame-Options`, `Referrer-Policy` and
/// `X-XSS-Protection` to every response, and `Cache-Control: no-store` when
/// the handler did not choose a caching policy.
///
/// `Strict-Transport-Security` belongs to the TLS-terminating proxy.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in FIXED_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        );
    }

    response
}
