/// Song domain type
use crate::types::SongId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

/// A song in the library
///
/// Identity is carried entirely by `id`: two values with the same id denote
/// the same song even if their other fields differ, which is why
/// `PartialEq`/`Hash` are implemented by hand instead of derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier, assigned at import
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Genre
    pub genre: Option<String>,

    /// Track duration, if known
    pub duration: Option<Duration>,

    /// File path on disk (immutable after import)
    pub file_path: PathBuf,

    /// Album art reference (path or URI)
    pub album_art: Option<String>,

    /// Track number in album
    pub track_number: Option<u32>,

    /// Release year
    pub year: Option<u32>,

    /// Song lyrics, lazily loaded from the store
    pub lyrics: Option<String>,
}

impl Song {
    /// Create a new song with a fresh id and minimal metadata
    pub fn new(title: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            id: SongId::generate(),
            title: title.into(),
            artist: None,
            album: None,
            genre: None,
            duration: None,
            file_path,
            album_art: None,
            track_number: None,
            year: None,
            lyrics: None,
        }
    }

    /// Display label in "Artist - Title" form
    pub fn display_label(&self) -> String {
        format!(
            "{} - {}",
            self.artist.as_deref().unwrap_or("Unknown"),
            self.title
        )
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
