/// Playlist domain type
use crate::types::{PlaylistId, Song, SongId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, ordered, duplicate-free list of songs
///
/// Songs are referenced by value; a song may belong to any number of
/// playlists and the library at the same time. `modified_at` is bumped on
/// every structural or metadata change and never precedes `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier, immutable after creation
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    songs: Vec<Song>,

    /// Creation timestamp, set once
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            description: None,
            songs: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Reconstruct a playlist from stored fields (for database loading)
    pub fn with_parts(
        id: PlaylistId,
        name: impl Into<String>,
        description: Option<String>,
        songs: Vec<Song>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description,
            songs,
            created_at,
            modified_at,
        }
    }

    /// Add a song to the end of the playlist
    ///
    /// No-op if a song with the same id is already present; returns whether
    /// the song was actually added.
    pub fn add_song(&mut self, song: Song) -> bool {
        if self.contains(&song.id) {
            return false;
        }
        self.songs.push(song);
        self.touch();
        true
    }

    /// Remove a song by id; returns whether anything was removed
    pub fn remove_song(&mut self, id: &SongId) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| &s.id != id);
        if self.songs.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Remove several songs by id; returns whether anything was removed
    pub fn remove_songs(&mut self, ids: &[SongId]) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| !ids.contains(&s.id));
        if self.songs.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Remove every song
    pub fn clear(&mut self) {
        if !self.songs.is_empty() {
            self.songs.clear();
            self.touch();
        }
    }

    /// Move the song at `from` to position `to`
    ///
    /// Out-of-range indices leave the playlist untouched.
    pub fn move_song(&mut self, from: usize, to: usize) {
        if from >= self.songs.len() || to >= self.songs.len() || from == to {
            return;
        }
        let song = self.songs.remove(from);
        self.songs.insert(to, song);
        self.touch();
    }

    /// Rename the playlist
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Whether a song with this id is present
    pub fn contains(&self, id: &SongId) -> bool {
        self.songs.iter().any(|s| &s.id == id)
    }

    /// Position of a song in the playlist
    pub fn position_of(&self, id: &SongId) -> Option<usize> {
        self.songs.iter().position(|s| &s.id == id)
    }

    /// The ordered song list
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the playlist holds no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
