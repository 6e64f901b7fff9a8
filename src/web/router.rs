//! Router configuration for the site.

use std::path::Path;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{home, submit_contact, AppState};
use super::middleware::security_headers;

/// Caching policy for files under `/static`.
pub const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Create the main router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(home))
        .route("/contact", post(submit_contact))
        .merge(create_health_router());

    if state.config.web.serve_static {
        if let Some(static_router) = create_static_router(&state.config.web.static_path) {
            router = router.merge(static_router);
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Serve files under `/static` from `path`, if the directory exists.
///
/// Responses carry [`STATIC_CACHE_CONTROL`].
pub fn create_static_router<S>(path: &str) -> Option<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    if !Path::new(path).is_dir() {
        tracing::debug!(path, "Static directory not found, static files disabled");
        return None;
    }

    Some(
        Router::new()
            .nest_service("/static", ServeDir::new(path))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static(STATIC_CACHE_CONTROL),
            )),
    )
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
