//! CORS policy construction.

use axum::http::{header, HeaderValue, Method};
use codebin_core::CorsPolicy;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer for `policy`.
///
/// GET, POST and OPTIONS are allowed, along with the `Content-Type` and
/// `Authorization` request headers. Allow-list entries that are not valid
/// header values are skipped with a warning.
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match policy {
        CorsPolicy::AllowAll => base.allow_origin(Any),
        CorsPolicy::AllowList(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(err) => {
                        tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, err);
                        None
                    }
                })
                .collect();
            base.allow_origin(AllowOrigin::list(origins))
        }
    }
}
