//! Liveness endpoints. Neither touches the datastore.

use axum::Json;
use serde_json::{json, Value};

/// Report that the process is up.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Fixed payload for checking cross-origin setup from a browser.
pub async fn cors_check() -> Json<Value> {
    Json(json!({ "message": "CORS is working" }))
}
