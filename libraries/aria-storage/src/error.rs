/// Storage error types
use thiserror::Error;

/// Errors raised while opening or migrating the database
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Result type for storage setup operations
pub type Result<T> = std::result::Result<T, StorageError>;
