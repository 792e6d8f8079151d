//! Play queue
//!
//! The transient, session-local list of songs eligible for navigation.
//! Unlike playlists the queue may hold the same song several times, and it
//! is never persisted. It is rebuilt wholesale by playlist/selection play
//! (`replace`) or grown by add-to-queue (`push`/`extend`).

use aria_core::types::{PlaylistId, Song, SongId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Ordered queue of songs with an optional originating playlist
///
/// The originating playlist is recorded for status display only; the queue
/// holds song copies, not a live view, so deleting that playlist leaves the
/// queue untouched.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    songs: Vec<Song>,
    source_playlist: Option<PlaylistId>,
}

impl PlayQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire queue contents
    pub fn replace(&mut self, songs: Vec<Song>, source_playlist: Option<PlaylistId>) {
        self.songs = songs;
        self.source_playlist = source_playlist;
    }

    /// Append a single song to the end of the queue
    pub fn push(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Append several songs to the end of the queue
    pub fn extend(&mut self, songs: Vec<Song>) {
        self.songs.extend(songs);
    }

    /// Remove the first occurrence of a song; returns whether one was found
    pub fn remove_first(&mut self, id: &SongId) -> bool {
        if let Some(pos) = self.songs.iter().position(|s| &s.id == id) {
            self.songs.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove every occurrence of each of the given songs
    pub fn remove_songs(&mut self, ids: &[SongId]) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| !ids.contains(&s.id));
        self.songs.len() != before
    }

    /// Drop all songs (the originating playlist is forgotten too)
    pub fn clear(&mut self) {
        self.songs.clear();
        self.source_playlist = None;
    }

    /// Randomly permute the queue order in place
    ///
    /// Independent of the navigator's shuffle-selection mode; this is the
    /// one-shot "shuffle queue" operation.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.songs.shuffle(rng);
    }

    /// Forget the recorded originating playlist
    pub fn clear_source_playlist(&mut self) {
        self.source_playlist = None;
    }

    /// The originating playlist, if the queue was built from one
    pub fn source_playlist(&self) -> Option<&PlaylistId> {
        self.source_playlist.as_ref()
    }

    /// The queued songs in play order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Number of queued songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
