//! HTTP layer for folio.
//!
//! Serves the localized home page, accepts contact form posts and keeps a
//! small signed-cookie session for the chosen locale and flash messages.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod session;

pub use error::WebError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
pub use session::{Flash, Session, SESSION_COOKIE};
