/// Core traits for Aria Player
use crate::error::Result;
use crate::types::{Playlist, PlaylistId, Song, SongId};
use async_trait::async_trait;
use std::path::Path;

/// Persistence trait for songs and playlists
///
/// Implementers provide durable storage; the controller treats every call
/// as fire-and-forget and keeps in-memory state authoritative for the
/// session. The trait is object-safe so callers can hold
/// `Arc<dyn LibraryStore>`.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Insert or replace a song
    async fn save_song(&self, song: &Song) -> Result<()>;

    /// Delete a song by id
    async fn delete_song(&self, id: &SongId) -> Result<()>;

    /// Get all songs, ordered by artist, album, track number
    async fn get_all_songs(&self) -> Result<Vec<Song>>;

    /// Insert or replace a playlist, including its full ordered membership
    async fn save_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist by id
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;

    /// Get all playlists with their songs, ordered by name
    async fn get_all_playlists(&self) -> Result<Vec<Playlist>>;

    /// Fetch the stored lyrics for a song
    async fn song_lyrics(&self, id: &SongId) -> Result<Option<String>>;

    /// Replace the stored lyrics for a song
    async fn update_song_lyrics(&self, id: &SongId, lyrics: &str) -> Result<()>;
}

/// Metadata extraction trait
///
/// Implementers turn an audio file into a `Song` with a freshly generated
/// id. Extraction failures are errors; callers decide the fallback policy.
pub trait MetadataExtractor: Send + Sync {
    /// Extract metadata from an audio file into a new `Song`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn extract(&self, path: &Path) -> Result<Song>;

    /// Check whether the file has a supported audio extension
    fn supports(&self, path: &Path) -> bool;
}
