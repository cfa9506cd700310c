//! HTTP server wiring for CodeBin (API, handlers, and shared state).

/// CORS policy construction.
pub mod cors;
/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for snippet and health endpoints.
pub mod handlers;
/// Fixed-window rate limiting middleware.
pub mod rate_limit;

pub use codebin_core::{
    config, models, validation, AppError, Config, CorsPolicy, Database, DeploymentEnv,
    RateLimitConfig, DEFAULT_PORT,
};
pub use rate_limit::FixedWindowRateLimiter;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use codebin_core::constants::MAX_REQUEST_BODY_BYTES;
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub rate_limiter: Arc<FixedWindowRateLimiter>,
}

impl AppState {
    /// Construct shared application state with a limiter built from `config`.
    pub fn new(config: Config, db: Database) -> Self {
        let rate_limiter = Arc::new(FixedWindowRateLimiter::new(config.rate_limit));
        Self::with_rate_limiter(config, db, rate_limiter)
    }

    /// Construct shared application state around an existing limiter.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    /// - `rate_limiter`: Limiter shared with the caller (e.g. for inspection in tests).
    pub fn with_rate_limiter(
        config: Config,
        db: Database,
        rate_limiter: Arc<FixedWindowRateLimiter>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            rate_limiter,
        }
    }

    /// Whether 500 responses should carry the underlying error text.
    pub fn echoes_error_details(&self) -> bool {
        self.config.deployment.echoes_error_details()
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/snippets", post(handlers::snippet::create_snippet))
        .route("/api/snippets/:id", get(handlers::snippet::get_snippet))
        .route("/api/test", get(handlers::health::cors_check))
        .route("/health", get(handlers::health::health));
    with_middleware(routes, state)
}

/// Attach state and the cross-cutting middleware stack to `routes`.
///
/// Outermost first: request tracing, panic recovery, CORS, body limit, then
/// the per-client rate limiter.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = cors::cors_layer(&state.config.cors);
    routes
        .layer(axum::middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit::enforce_rate_limit,
        ))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES)),
        )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "non-string panic payload"
    };
    tracing::error!("Request handler panicked: {}", detail);
    (StatusCode::INTERNAL_SERVER_ERROR, "Something broke!").into_response()
}

/// Resolve the listener address from `BIND` or the configured port.
///
/// # Returns
/// `BIND` when it parses as a socket address, otherwise `0.0.0.0:{port}`.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    }
}

/// Run the Axum server with graceful shutdown support.
///
/// Peer addresses are recorded on each request so the rate limiter can key
/// on them.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}
