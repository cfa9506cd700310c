//! HTTP request handlers.

/// Liveness and CORS smoke-test endpoints.
pub mod health;
/// Snippet create and lookup endpoints.
pub mod snippet;
