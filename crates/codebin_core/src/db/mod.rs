//! Persistence layer for CodeBin backed by redb.

/// Snippet storage operations.
pub mod snippet;
/// Table definitions.
pub mod tables;


use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

pub use snippet::SnippetDb;

/// Database handle shared by every request handler.
pub struct Database {
    pub snippets: SnippetDb,
}

impl Database {
    /// Open (or create) the store under `path` and initialize its tables.
    ///
    /// `path` names a directory; the redb file lives inside it as
    /// [`tables::REDB_FILE_NAME`].
    ///
    /// # Returns
    /// A ready [`Database`].
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is
    /// held by another process, or table initialization fails.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(tables::REDB_FILE_NAME);
        let db = Arc::new(redb::Database::create(&file)?);
        tracing::debug!("Opened redb store at {}", file.display());

        Ok(Self {
            snippets: SnippetDb::new(db)?,
        })
    }
}
