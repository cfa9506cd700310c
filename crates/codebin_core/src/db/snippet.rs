//! Snippet storage operations backed by redb.

use crate::constants::{CODE_MAX_CHARS, TITLE_MAX_CHARS};
use crate::{db::tables::SNIPPETS, error::AppError, models::snippet::*};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

/// Accessor for the snippet table.
pub struct SnippetDb {
    db: Arc<redb::Database>,
}

/// Apply the store's own schema to a text column: trim, require, cap length.
///
/// This runs independently of request validation, so values that changed
/// shape after validation (for example by HTML escaping) are still bounded.
fn schema_text(field: &str, value: &str, max_chars: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::SchemaViolation(format!(
            "Path `{}` is required.",
            field
        )));
    }
    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(AppError::SchemaViolation(format!(
            "Path `{}` ({} characters) is longer than the maximum allowed length ({}).",
            field, len, max_chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize a stored id lookup key.
///
/// Anything that is not a UUID can never have been issued by [`SnippetDb::create`].
fn lookup_key(id: &str) -> Option<String> {
    Uuid::parse_str(id.trim())
        .ok()
        .map(|uuid| uuid.hyphenated().to_string())
}

impl SnippetDb {
    /// Initialize the snippet table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SNIPPETS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Store a new snippet, assigning its id and timestamps.
    ///
    /// # Returns
    /// The stored [`Snippet`].
    ///
    /// # Errors
    /// Returns [`AppError::SchemaViolation`] when a field breaks the stored
    /// schema, or a storage/serialization error when the insert fails.
    pub fn create(&self, new: &NewSnippet) -> Result<Snippet, AppError> {
        let now = Utc::now();
        let snippet = Snippet {
            id: Uuid::new_v4().hyphenated().to_string(),
            title: schema_text("title", &new.title, TITLE_MAX_CHARS)?,
            code: schema_text("code", &new.code, CODE_MAX_CHARS)?,
            language: new.language,
            created_at: now,
            updated_at: now,
        };
        let encoded = bincode::serialize(&snippet)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut snippets = write_txn.open_table(SNIPPETS)?;
            if snippets.get(snippet.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Snippet id '{}' already exists",
                    snippet.id
                )));
            }
            snippets.insert(snippet.id.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(id = %snippet.id, language = %snippet.language, "snippet stored");
        Ok(snippet)
    }

    /// Fetch a snippet by id.
    ///
    /// Malformed ids are reported as missing rather than as errors.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when found, `Ok(None)` when missing or malformed.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let Some(key) = lookup_key(id) else {
            return Ok(None);
        };
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        match snippets.get(key.as_str())? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }
}
