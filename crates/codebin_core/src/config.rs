//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_ALLOWED_ORIGINS, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW,
};
use crate::error::AppError;
use std::env;
use std::time::Duration;

const CONNECTION_STRING_VAR: &str = "DATASTORE_CONNECTION_STRING";
const REDB_SCHEME: &str = "redb://";

/// Deployment flavor selected by `DEPLOYMENT_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentEnv {
    Production,
    #[default]
    Development,
}

impl DeploymentEnv {
    /// Parse a `DEPLOYMENT_ENV` value.
    ///
    /// Unrecognized values fall back to [`DeploymentEnv::Development`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Default tracing filter for this deployment when `RUST_LOG` is unset.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Production => "codebin=info,codebin_server=info,codebin_core=info,tower_http=warn",
            Self::Development => {
                "codebin=debug,codebin_server=debug,codebin_core=debug,tower_http=debug"
            }
        }
    }

    /// Whether internal error detail is echoed in 500 response bodies.
    pub fn echoes_error_details(self) -> bool {
        !self.is_production()
    }
}

/// Cross-origin policy applied to every route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Accept requests from any origin. Intended for local development.
    AllowAll,
    /// Accept only the listed origins.
    AllowList(Vec<String>),
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::AllowList(
            DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        )
    }
}

/// Fixed-window rate-limit budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

/// Runtime configuration for CodeBin.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the redb database file.
    pub db_path: String,
    pub port: u16,
    pub deployment: DeploymentEnv,
    pub cors: CorsPolicy,
    pub rate_limit: RateLimitConfig,
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Strip an optional `redb://` scheme from a datastore connection string.
///
/// # Returns
/// The filesystem path part, or `None` when nothing usable remains.
pub fn parse_connection_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let path = trimmed.strip_prefix(REDB_SCHEME).unwrap_or(trimmed).trim();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn cors_policy_from_env() -> CorsPolicy {
    if env_flag_enabled("CORS_ALLOW_ALL") {
        return CorsPolicy::AllowAll;
    }
    match env::var("CORS_ALLOWED_ORIGINS") {
        Ok(raw) => {
            let origins = parse_origin_list(&raw);
            if origins.is_empty() {
                CorsPolicy::default()
            } else {
                CorsPolicy::AllowList(origins)
            }
        }
        Err(_) => CorsPolicy::default(),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied for optional settings.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when `DATASTORE_CONNECTION_STRING` is
    /// missing or blank.
    pub fn from_env() -> Result<Self, AppError> {
        let db_path = env::var(CONNECTION_STRING_VAR)
            .ok()
            .and_then(|raw| parse_connection_string(&raw))
            .ok_or_else(|| {
                AppError::Config(format!("{} must be set", CONNECTION_STRING_VAR))
            })?;

        Ok(Self {
            db_path,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            deployment: env::var("DEPLOYMENT_ENV")
                .map(|value| DeploymentEnv::parse(&value))
                .unwrap_or_default(),
            cors: cors_policy_from_env(),
            rate_limit: RateLimitConfig::default(),
        })
    }
}
