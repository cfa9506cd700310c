//! HTTP error mapping for API handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use codebin_core::{validation::FieldViolation, AppError};
use serde_json::json;

/// Error returned by route handlers and rendered as a JSON envelope.
#[derive(Debug)]
pub enum HttpError {
    /// One or more request fields failed validation.
    Validation(Vec<FieldViolation>),
    /// The body could not be read as JSON (malformed, or over the size limit).
    Body(JsonRejection),
    /// No snippet exists under the requested id.
    NotFound,
    /// The store failed or refused the operation.
    Persistence {
        context: &'static str,
        source: AppError,
        echo_details: bool,
    },
}

impl HttpError {
    /// Wrap a storage failure with the client-facing `context` message.
    ///
    /// `echo_details` controls whether the underlying error text is included
    /// in the response body; it is always logged.
    pub fn persistence(context: &'static str, source: AppError, echo_details: bool) -> Self {
        Self::Persistence {
            context,
            source,
            echo_details,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            HttpError::Body(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                (
                    rejection.status(),
                    Json(json!({ "error": rejection.body_text() })),
                )
                    .into_response()
            }
            HttpError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Snippet not found" })),
            )
                .into_response(),
            HttpError::Persistence {
                context,
                source,
                echo_details,
            } => {
                tracing::error!("{}: {}", context, source);
                let body = if echo_details {
                    json!({ "error": context, "details": source.to_string() })
                } else {
                    json!({ "error": context })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
