//! Core domain library for CodeBin (config, storage, models, validation).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Environment mutation helpers for tests.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Request-body validation.
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, CorsPolicy, DeploymentEnv, RateLimitConfig};
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
