//! Error types for playback orchestration

use aria_core::types::{PlaylistId, SongId};
use thiserror::Error;

/// Playback and controller errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Rejected input (blank playlist name, empty selection, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A song with this id is already in the library
    #[error("Song already in library: {0}")]
    DuplicateSong(SongId),

    /// No song with this id in the library
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// No playlist with this id
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// The playback engine rejected a command
    #[error("Engine error: {0}")]
    Engine(String),

    /// The library store failed a synchronous read
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<aria_core::AriaError> for PlayerError {
    fn from(err: aria_core::AriaError) -> Self {
        Self::Engine(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
