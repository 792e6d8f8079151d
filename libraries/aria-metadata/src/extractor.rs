/// Metadata extractor implementation using lofty
use crate::error::MetadataError;
use aria_core::types::Song;
use aria_core::MetadataExtractor;
use lofty::{AudioFile, TaggedFileExt};
use std::path::Path;

/// Extensions accepted by the import pipeline
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aac", "wma"];

/// Placeholder artist when the file carries no usable tag
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Placeholder album when the file carries no usable tag
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Metadata extractor backed by the lofty library
pub struct LoftyExtractor;

impl LoftyExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Copy tag fields onto the song, keeping defaults for blank values
    fn apply_tag(song: &mut Song, tag: &lofty::Tag) {
        for item in tag.items() {
            let Some(text) = item.value().text().map(str::trim).filter(|t| !t.is_empty())
            else {
                continue;
            };

            match item.key() {
                lofty::ItemKey::TrackTitle => song.title = text.to_string(),
                lofty::ItemKey::TrackArtist => song.artist = Some(text.to_string()),
                lofty::ItemKey::AlbumTitle => song.album = Some(text.to_string()),
                lofty::ItemKey::Genre => song.genre = Some(text.to_string()),
                lofty::ItemKey::Year => song.year = text.parse().ok(),
                lofty::ItemKey::TrackNumber => {
                    // Tags write both "3" and "3/12"
                    song.track_number = text.split('/').next().and_then(|n| n.parse().ok());
                }
                _ => {}
            }
        }
    }
}

impl Default for LoftyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> aria_core::Result<Song> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()).into());
        }

        let tagged_file = lofty::read_from_path(path)
            .map_err(|e| MetadataError::Unreadable(e.to_string()))?;

        let mut song = Song::new(title_from_filename(path), path.to_path_buf());
        song.artist = Some(UNKNOWN_ARTIST.to_string());
        song.album = Some(UNKNOWN_ALBUM.to_string());

        let duration = tagged_file.properties().duration();
        if !duration.is_zero() {
            song.duration = Some(duration);
        }

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.tags().first()) {
            Self::apply_tag(&mut song, tag);
        }

        Ok(song)
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Derive a title from the file name, dropping the extension
pub fn title_from_filename(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}
