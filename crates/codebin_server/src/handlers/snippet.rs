//! Snippet HTTP handlers.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use codebin_core::{
    models::snippet::{CreatedSnippet, Snippet},
    validation::validate_create_request,
    AppError,
};
use serde_json::Value;

const CREATE_FAILED: &str = "Error creating snippet";
const FETCH_FAILED: &str = "Error fetching snippet";

/// Run a blocking store call off the async workers.
async fn run_blocking<T, F>(op: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| AppError::StorageMessage(format!("Storage task failed: {}", err)))?
}

/// Interpret the request body as JSON.
///
/// A request without a JSON content type carries no body fields, so it goes
/// on to validation as an empty body instead of failing here.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, HttpError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Null),
        Err(rejection) => Err(HttpError::Body(rejection)),
    }
}

/// Create a new snippet.
///
/// # Returns
/// `201 Created` with the new snippet id.
///
/// # Errors
/// Returns 400 for malformed JSON or invalid fields, 500 when the store
/// rejects or fails the insert.
pub async fn create_snippet(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedSnippet>), HttpError> {
    let body = json_body(payload)?;
    let new_snippet = validate_create_request(&body).map_err(HttpError::Validation)?;

    let db = state.db.clone();
    let snippet = run_blocking(move || db.snippets.create(&new_snippet))
        .await
        .map_err(|err| HttpError::persistence(CREATE_FAILED, err, state.echoes_error_details()))?;

    tracing::info!(id = %snippet.id, language = %snippet.language, "snippet created");
    Ok((StatusCode::CREATED, Json(CreatedSnippet { id: snippet.id })))
}

/// Extract the snippet id from the path.
///
/// A segment that cannot be decoded is as unknown as any other malformed id.
fn snippet_id(path: Result<Path<String>, PathRejection>) -> Result<String, HttpError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Rejected snippet id: {}", rejection.body_text());
            Err(HttpError::NotFound)
        }
    }
}

/// Fetch a snippet by id.
///
/// # Returns
/// The snippet as JSON.
///
/// # Errors
/// Returns 404 when the id is unknown or malformed, 500 when lookup fails.
pub async fn get_snippet(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Snippet>, HttpError> {
    let id = snippet_id(path)?;
    let db = state.db.clone();
    run_blocking(move || db.snippets.find_by_id(&id))
        .await
        .map_err(|err| HttpError::persistence(FETCH_FAILED, err, state.echoes_error_details()))?
        .map(Json)
        .ok_or(HttpError::NotFound)
}
