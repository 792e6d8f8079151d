//! Import error types

use thiserror::Error;

/// Import errors
///
/// Per-file extraction failures are not errors: they fall back to
/// filename-derived metadata and the batch continues.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Directory walk failed before the batch could start
    #[error("Scan failed: {0}")]
    Scan(String),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
