//! Shared constants used across CodeBin crates.

use std::time::Duration;

/// Default listen port when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum snippet title length, in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum snippet code length, in characters, after trimming.
pub const CODE_MAX_CHARS: usize = 10_000;

/// Origins accepted when no explicit allow-list is configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] =
    ["https://codebin-seven.vercel.app", "http://localhost:5173"];

/// Requests allowed per client per window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 500;

/// Fixed rate-limit window length (15 minutes).
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Upper bound on accepted request bodies.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
