//! Fixed-window request limiting keyed by client address.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use codebin_core::RateLimitConfig;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Key shared by requests whose peer address is unavailable.
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Map size at which expired windows are swept, at most once per window length.
const SWEEP_THRESHOLD: usize = 10_000;

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    hits: u32,
}

impl Window {
    fn expired(&self, now: Instant, length: Duration) -> bool {
        now.saturating_duration_since(self.started_at) >= length
    }

    fn resets_in(&self, now: Instant, length: Duration) -> Duration {
        length.saturating_sub(now.saturating_duration_since(self.started_at))
    }
}

#[derive(Debug, Default)]
struct LimiterState {
    windows: HashMap<String, Window>,
    last_sweep: Option<Instant>,
}

impl LimiterState {
    fn sweep_due(&self, now: Instant, length: Duration) -> bool {
        self.windows.len() >= SWEEP_THRESHOLD
            && self
                .last_sweep
                .map_or(true, |at| now.saturating_duration_since(at) >= length)
    }
}

/// Outcome of counting one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32, resets_in: Duration },
    Limited { resets_in: Duration },
}

/// Process-wide fixed-window limiter.
///
/// Each client gets a window that opens on its first request and admits at
/// most `max_requests` requests until it closes.
pub struct FixedWindowRateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

impl FixedWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState::default()),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count one request from `client` at the current instant.
    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    /// Count one request from `client` at `now`.
    ///
    /// A poisoned state mutex admits the request; limiting is best-effort.
    pub fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let length = self.config.window;
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => {
                tracing::error!("Rate limiter state is poisoned; admitting request");
                return RateLimitDecision::Allowed {
                    remaining: self.config.max_requests,
                    resets_in: length,
                };
            }
        };

        if state.sweep_due(now, length) {
            state
                .windows
                .retain(|_, window| !window.expired(now, length));
            state.last_sweep = Some(now);
        }

        let window = state.windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            hits: 0,
        });
        if window.expired(now, length) {
            *window = Window {
                started_at: now,
                hits: 0,
            };
        }

        let resets_in = window.resets_in(now, length);
        if window.hits >= self.config.max_requests {
            return RateLimitDecision::Limited { resets_in };
        }
        window.hits += 1;
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - window.hits,
            resets_in,
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.windows.len())
            .unwrap_or(0)
    }
}

/// Derive the limiter key for a request from its peer address.
pub fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT_KEY.to_string())
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn insert_header(response: &mut Response, name: HeaderName, value: u64) {
    response
        .headers_mut()
        .insert(name, HeaderValue::from(value));
}

/// Middleware rejecting requests once the client's window budget is spent.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<FixedWindowRateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    let limit = u64::from(limiter.config().max_requests);

    match limiter.check(&client) {
        RateLimitDecision::Allowed {
            remaining,
            resets_in,
        } => {
            let mut response = next.run(req).await;
            insert_header(&mut response, RATE_LIMIT_LIMIT, limit);
            insert_header(&mut response, RATE_LIMIT_REMAINING, u64::from(remaining));
            insert_header(&mut response, RATE_LIMIT_RESET, ceil_secs(resets_in));
            response
        }
        RateLimitDecision::Limited { resets_in } => {
            tracing::warn!(client = %client, "rate limit exceeded");
            let reset_secs = ceil_secs(resets_in);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Too many requests, please try again later." })),
            )
                .into_response();
            insert_header(&mut response, RATE_LIMIT_LIMIT, limit);
            insert_header(&mut response, RATE_LIMIT_REMAINING, 0);
            insert_header(&mut response, RATE_LIMIT_RESET, reset_secs);
            insert_header(&mut response, header::RETRY_AFTER, reset_secs);
            response
        }
    }
}
