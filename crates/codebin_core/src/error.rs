//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// A record was refused by the store's own schema checks.
    #[error("Snippet validation failed: {0}")]
    SchemaViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// redb splits its errors per operation; fold them all into `redb::Error`.
macro_rules! from_redb_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::Database(value.into())
                }
            }
        )+
    };
}

from_redb_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
