//! Middleware for the site.

pub mod security;

pub use security::security_headers;
