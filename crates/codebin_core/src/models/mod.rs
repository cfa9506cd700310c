//! Data models for API requests and persistence.

/// Snippet entity, language tags, and API payloads.
pub mod snippet;
