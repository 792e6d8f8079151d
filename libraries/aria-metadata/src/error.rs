//! Metadata error types

use thiserror::Error;

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// File does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File exists but could not be parsed as audio
    #[error("Unreadable audio file: {0}")]
    Unreadable(String),
}

impl From<MetadataError> for aria_core::AriaError {
    fn from(err: MetadataError) -> Self {
        aria_core::AriaError::metadata(err.to_string())
    }
}

/// Result type for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;
