//! Player - core orchestration
//!
//! Owns the library, playlists, and queue, delegates transport control to
//! the engine behind the state machine, and asks the navigator for queue
//! decisions. All methods are synchronous with respect to in-memory state;
//! persistence is delegated to the store as fire-and-forget tasks, so the
//! player must live on a tokio runtime.
//!
//! Engine lifecycle events and import results arrive asynchronously; the
//! application drains their channels on the interaction context and feeds
//! them in through `handle_engine_event` / `add_imported_song`, which keeps
//! every structural mutation on a single writer.

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::{PlayerError, Result};
use crate::events::{EventBus, PlayerEvent};
use crate::navigator;
use crate::queue::PlayQueue;
use crate::transport::{Transport, TransportUpdate};
use crate::types::{PlaybackState, PlayerConfig, RepeatMode};
use aria_core::types::{Playlist, PlaylistId, Song, SongId};
use aria_core::LibraryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Central player controller
pub struct Player {
    library: Vec<Song>,
    playlists: Vec<Playlist>,
    queue: PlayQueue,
    transport: Transport,
    store: Arc<dyn LibraryStore>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: StdRng,
    events: EventBus,
}

impl Player {
    /// Create a player around an engine and a store
    pub fn new(
        engine: Box<dyn PlaybackEngine>,
        store: Arc<dyn LibraryStore>,
        config: PlayerConfig,
    ) -> Self {
        Self::with_rng(engine, store, config, StdRng::from_entropy())
    }

    /// Create a player with an explicit random source
    ///
    /// Shuffle selection and queue shuffling draw from this generator, so
    /// tests can seed it for deterministic navigation.
    pub fn with_rng(
        engine: Box<dyn PlaybackEngine>,
        store: Arc<dyn LibraryStore>,
        config: PlayerConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            library: Vec::new(),
            playlists: Vec::new(),
            queue: PlayQueue::new(),
            transport: Transport::new(engine, config.volume),
            store,
            shuffle: config.shuffle,
            repeat: config.repeat,
            rng,
            events: EventBus::new(),
        }
    }

    /// Subscribe to player events
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Populate library and playlists from the store
    ///
    /// Songs arrive ordered by artist, album, track number; playlists by
    /// name. Intended to run once at startup, before any mutation.
    pub async fn load_from_store(&mut self) -> Result<()> {
        self.library = self
            .store
            .get_all_songs()
            .await
            .map_err(|e| PlayerError::Storage(e.to_string()))?;
        self.playlists = self
            .store
            .get_all_playlists()
            .await
            .map_err(|e| PlayerError::Storage(e.to_string()))?;

        self.events.emit(&PlayerEvent::LibraryChanged {
            size: self.library.len(),
        });
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    // ===== Engine event marshalling =====

    /// Apply an engine lifecycle event
    ///
    /// Must be called from the interaction context that owns this player.
    /// A natural end-of-media triggers automatic advance.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match self.transport.handle_event(event) {
            TransportUpdate::None => {}
            TransportUpdate::StateChanged(state) => {
                self.events.emit(&PlayerEvent::StateChanged { state });
            }
            TransportUpdate::PositionChanged(position) => {
                self.events.emit(&PlayerEvent::PositionChanged { position });
            }
            TransportUpdate::Finished => {
                self.events.emit(&PlayerEvent::StateChanged {
                    state: PlaybackState::Stopped,
                });
                self.auto_advance();
            }
            TransportUpdate::Failed(message) => {
                self.events.emit(&PlayerEvent::StateChanged {
                    state: PlaybackState::Stopped,
                });
                self.events.emit(&PlayerEvent::PlaybackError { message });
            }
        }
    }

    /// Advance after a song finished naturally
    ///
    /// Repeat-one reloads the very same song, bypassing selection: a
    /// literal repeat must not be affected by shuffle.
    fn auto_advance(&mut self) {
        if self.repeat == RepeatMode::One {
            if let Some(song) = self.transport.current().cloned() {
                if let Err(err) = self.start_song(song) {
                    self.events.emit(&PlayerEvent::PlaybackError {
                        message: err.to_string(),
                    });
                }
                return;
            }
        }

        if let Err(err) = self.next() {
            self.events.emit(&PlayerEvent::PlaybackError {
                message: err.to_string(),
            });
        }
    }

    // ===== Transport =====

    /// Start or resume playback of the current song
    pub fn play(&mut self) -> Result<()> {
        self.transport.play()
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        self.transport.pause()
    }

    /// Stop playback; safe no-op when nothing is loaded
    pub fn stop(&mut self) -> Result<()> {
        self.transport.stop()
    }

    /// Seek to a ratio of the song duration; ignored while loading
    pub fn seek(&mut self, ratio: f64) -> Result<()> {
        self.transport.seek(ratio)
    }

    /// Set the output volume
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.transport.set_volume(volume)?;
        self.events.emit(&PlayerEvent::VolumeChanged {
            volume: self.transport.volume(),
        });
        Ok(())
    }

    // ===== Navigation =====

    /// Skip to the next song per shuffle flag and repeat mode
    ///
    /// Reaching the end of the queue with repeat off stops playback and
    /// leaves the current song in place.
    pub fn next(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let current_id = self.transport.current().map(|s| s.id.clone());
        let target = navigator::next_index(
            self.queue.songs(),
            current_id.as_ref(),
            self.shuffle,
            self.repeat,
            &mut self.rng,
        );

        match target {
            Some(index) => {
                let song = self.queue.songs()[index].clone();
                self.start_song(song)
            }
            None => self.transport.stop(),
        }
    }

    /// Skip to the previous song per shuffle flag and repeat mode
    ///
    /// At the start of the queue with repeat off, nothing happens.
    pub fn previous(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let current_id = self.transport.current().map(|s| s.id.clone());
        let target = navigator::previous_index(
            self.queue.songs(),
            current_id.as_ref(),
            self.shuffle,
            self.repeat,
            &mut self.rng,
        );

        if let Some(index) = target {
            let song = self.queue.songs()[index].clone();
            self.start_song(song)?;
        }
        Ok(())
    }

    /// Load a song into the engine and start it from position zero
    fn start_song(&mut self, song: Song) -> Result<()> {
        self.transport.load(song)?;
        self.transport.play()?;
        self.events.emit(&PlayerEvent::SongChanged {
            song: self.transport.current().cloned(),
        });
        Ok(())
    }

    // ===== Play entry points =====

    /// Replace the queue with the given songs and start the first one
    ///
    /// `from_playlist` records the originating playlist for status display.
    pub fn play_selected_songs(
        &mut self,
        songs: Vec<Song>,
        from_playlist: Option<PlaylistId>,
    ) -> Result<()> {
        let Some(first) = songs.first().cloned() else {
            return Ok(());
        };

        self.queue.replace(songs, from_playlist);
        self.events.emit(&PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.start_song(first)
    }

    /// Replace the queue with a playlist's tail starting at `song_id`
    ///
    /// No-op if the song is not in the playlist.
    pub fn play_playlist_from_song(
        &mut self,
        song_id: &SongId,
        playlist_id: &PlaylistId,
    ) -> Result<()> {
        let playlist = self
            .playlists
            .iter()
            .find(|p| &p.id == playlist_id)
            .ok_or_else(|| PlayerError::PlaylistNotFound(playlist_id.clone()))?;

        let Some(start) = playlist.position_of(song_id) else {
            return Ok(());
        };

        let songs = playlist.songs()[start..].to_vec();
        let first = songs[0].clone();
        self.queue.replace(songs, Some(playlist.id.clone()));
        self.events.emit(&PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.start_song(first)
    }

    /// Play a single song immediately without touching the queue contents
    ///
    /// The recorded originating playlist is cleared - this song plays
    /// outside any playlist context.
    pub fn play_now(&mut self, song: Song) -> Result<()> {
        self.queue.clear_source_playlist();
        self.start_song(song)
    }

    // ===== Library =====

    /// Add a song to the library
    ///
    /// Rejects a song whose id is already present.
    pub fn add_song_to_library(&mut self, song: Song) -> Result<()> {
        if self.library.iter().any(|s| s.id == song.id) {
            return Err(PlayerError::DuplicateSong(song.id));
        }

        self.persist_song(song.clone());
        self.library.push(song);
        self.events.emit(&PlayerEvent::LibraryChanged {
            size: self.library.len(),
        });
        Ok(())
    }

    /// Accept a song produced by the import pipeline
    ///
    /// The serialization point for import workers: duplicates are skipped
    /// silently so one bad batch entry cannot fail the rest. Returns
    /// whether the song was added.
    pub fn add_imported_song(&mut self, song: Song) -> bool {
        let id = song.id.clone();
        match self.add_song_to_library(song) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("skipping duplicate imported song {id}");
                false
            }
        }
    }

    /// Remove a song from the library, every playlist, and the queue
    ///
    /// If the song is currently loaded, playback stops and the current song
    /// is cleared.
    pub fn remove_song_from_library(&mut self, id: &SongId) -> Result<()> {
        let Some(pos) = self.library.iter().position(|s| &s.id == id) else {
            return Err(PlayerError::SongNotFound(id.clone()));
        };
        self.library.remove(pos);

        let queue_changed = self.queue.remove_songs(std::slice::from_ref(id));

        let mut touched = Vec::new();
        for playlist in &mut self.playlists {
            if playlist.remove_song(id) {
                touched.push(playlist.clone());
            }
        }

        if self.transport.current().is_some_and(|s| &s.id == id) {
            self.transport.clear();
            self.events.emit(&PlayerEvent::StateChanged {
                state: PlaybackState::Stopped,
            });
            self.events.emit(&PlayerEvent::SongChanged { song: None });
        }

        self.persist_song_delete(id.clone());
        let playlists_changed = !touched.is_empty();
        for playlist in touched {
            self.persist_playlist(playlist);
        }

        self.events.emit(&PlayerEvent::LibraryChanged {
            size: self.library.len(),
        });
        if queue_changed {
            self.events.emit(&PlayerEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
        if playlists_changed {
            self.events.emit(&PlayerEvent::PlaylistsChanged);
        }
        Ok(())
    }

    /// Remove several songs from the library
    ///
    /// Unknown ids are logged and skipped; the rest are removed.
    pub fn remove_songs_from_library(&mut self, ids: &[SongId]) {
        for id in ids {
            if let Err(err) = self.remove_song_from_library(id) {
                tracing::warn!("skipping library removal of {id}: {err}");
            }
        }
    }

    /// Case-insensitive substring search over title, artist, album, genre
    ///
    /// A blank query returns the whole library unfiltered.
    pub fn search_songs(&self, query: &str) -> Vec<Song> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.library.clone();
        }

        self.library
            .iter()
            .filter(|song| Self::matches_query(song, &query))
            .cloned()
            .collect()
    }

    fn matches_query(song: &Song, query: &str) -> bool {
        let field_matches =
            |field: &Option<String>| field.as_deref().is_some_and(|v| v.to_lowercase().contains(query));

        song.title.to_lowercase().contains(query)
            || field_matches(&song.artist)
            || field_matches(&song.album)
            || field_matches(&song.genre)
    }

    // ===== Playlists =====

    /// Create a playlist; the name must be non-blank after trimming
    pub fn create_playlist(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<PlaylistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlayerError::InvalidInput(
                "playlist name must not be blank".to_string(),
            ));
        }

        let mut playlist = Playlist::new(name);
        if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
            playlist.set_description(Some(description.to_string()));
        }

        let id = playlist.id.clone();
        self.persist_playlist(playlist.clone());
        self.playlists.push(playlist);
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(id)
    }

    /// Delete a playlist
    ///
    /// Terminal: the id becomes invalid. A queue built from this playlist
    /// keeps playing - it holds song copies, not a live view.
    pub fn delete_playlist(&mut self, id: &PlaylistId) -> Result<()> {
        let Some(pos) = self.playlists.iter().position(|p| &p.id == id) else {
            return Err(PlayerError::PlaylistNotFound(id.clone()));
        };
        self.playlists.remove(pos);

        self.persist_playlist_delete(id.clone());
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    /// Rename and/or re-describe a playlist
    pub fn update_playlist_details(
        &mut self,
        id: &PlaylistId,
        name: &str,
        description: Option<String>,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlayerError::InvalidInput(
                "playlist name must not be blank".to_string(),
            ));
        }

        let playlist = self.playlist_mut(id)?;
        playlist.set_name(name);
        playlist.set_description(description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()));
        let snapshot = playlist.clone();

        self.persist_playlist(snapshot);
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    /// Add a song to a playlist; adding an already-present id is a no-op
    pub fn add_song_to_playlist(&mut self, song: Song, playlist_id: &PlaylistId) -> Result<()> {
        self.add_songs_to_playlist(vec![song], playlist_id)
    }

    /// Add several songs to a playlist, skipping ids already present
    pub fn add_songs_to_playlist(
        &mut self,
        songs: Vec<Song>,
        playlist_id: &PlaylistId,
    ) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        let mut changed = false;
        for song in songs {
            changed |= playlist.add_song(song);
        }

        if changed {
            let snapshot = playlist.clone();
            self.persist_playlist(snapshot);
            self.events.emit(&PlayerEvent::PlaylistsChanged);
        }
        Ok(())
    }

    /// Remove songs from a playlist
    pub fn remove_songs_from_playlist(
        &mut self,
        ids: &[SongId],
        playlist_id: &PlaylistId,
    ) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        if playlist.remove_songs(ids) {
            let snapshot = playlist.clone();
            self.persist_playlist(snapshot);
            self.events.emit(&PlayerEvent::PlaylistsChanged);
        }
        Ok(())
    }

    /// Remove every song from a playlist
    pub fn clear_playlist(&mut self, playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        if playlist.is_empty() {
            return Ok(());
        }
        playlist.clear();
        let snapshot = playlist.clone();

        self.persist_playlist(snapshot);
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    /// Move a song one position toward the front of a playlist
    pub fn move_song_up(&mut self, song_id: &SongId, playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        let Some(index) = playlist.position_of(song_id).filter(|&i| i > 0) else {
            return Ok(());
        };
        playlist.move_song(index, index - 1);
        let snapshot = playlist.clone();

        self.persist_playlist(snapshot);
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    /// Move a song one position toward the back of a playlist
    pub fn move_song_down(&mut self, song_id: &SongId, playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        let len = playlist.len();
        let Some(index) = playlist.position_of(song_id).filter(|&i| i + 1 < len) else {
            return Ok(());
        };
        playlist.move_song(index, index + 1);
        let snapshot = playlist.clone();

        self.persist_playlist(snapshot);
        self.events.emit(&PlayerEvent::PlaylistsChanged);
        Ok(())
    }

    /// Move several songs one position toward the front
    ///
    /// Processed in ascending index order so the single-step moves compose
    /// without clobbering each other's target slots.
    pub fn move_songs_up(&mut self, ids: &[SongId], playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;

        let mut ordered = ids.to_vec();
        ordered.sort_by_key(|id| playlist.position_of(id).unwrap_or(usize::MAX));

        let mut moved = false;
        for id in &ordered {
            if let Some(index) = playlist.position_of(id).filter(|&i| i > 0) {
                playlist.move_song(index, index - 1);
                moved = true;
            }
        }

        if moved {
            let snapshot = playlist.clone();
            self.persist_playlist(snapshot);
            self.events.emit(&PlayerEvent::PlaylistsChanged);
        }
        Ok(())
    }

    /// Move several songs one position toward the back
    ///
    /// Processed in descending index order, mirroring `move_songs_up`.
    pub fn move_songs_down(&mut self, ids: &[SongId], playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self.playlist_mut(playlist_id)?;

        let mut ordered = ids.to_vec();
        ordered.sort_by_key(|id| {
            std::cmp::Reverse(playlist.position_of(id).unwrap_or(usize::MAX))
        });

        let mut moved = false;
        for id in &ordered {
            let len = playlist.len();
            if let Some(index) = playlist.position_of(id).filter(|&i| i + 1 < len) {
                playlist.move_song(index, index + 1);
                moved = true;
            }
        }

        if moved {
            let snapshot = playlist.clone();
            self.persist_playlist(snapshot);
            self.events.emit(&PlayerEvent::PlaylistsChanged);
        }
        Ok(())
    }

    fn playlist_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| PlayerError::PlaylistNotFound(id.clone()))
    }

    // ===== Queue =====

    /// Append a song to the queue
    pub fn add_to_queue(&mut self, song: Song) {
        self.queue.push(song);
        self.events.emit(&PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Append several songs to the queue
    pub fn add_songs_to_queue(&mut self, songs: Vec<Song>) {
        if songs.is_empty() {
            return;
        }
        self.queue.extend(songs);
        self.events.emit(&PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Remove the first queue occurrence of a song
    pub fn remove_song_from_queue(&mut self, id: &SongId) {
        if self.queue.remove_first(id) {
            self.events.emit(&PlayerEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
    }

    /// Remove every queue occurrence of each of the given songs
    pub fn remove_songs_from_queue(&mut self, ids: &[SongId]) {
        if self.queue.remove_songs(ids) {
            self.events.emit(&PlayerEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
    }

    /// Empty the queue
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.events.emit(&PlayerEvent::QueueChanged { length: 0 });
    }

    /// Randomly permute the queue order
    ///
    /// One-shot reordering of the container, independent of the navigator's
    /// shuffle-selection flag.
    pub fn shuffle_queue(&mut self) {
        if self.queue.len() <= 1 {
            return;
        }
        self.queue.shuffle(&mut self.rng);
        self.events.emit(&PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    // ===== Modes =====

    /// Flip the shuffle-selection flag
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.events.emit(&PlayerEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
        self.shuffle
    }

    /// Cycle the repeat mode Off -> All -> One -> Off
    pub fn toggle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycled();
        self.events.emit(&PlayerEvent::RepeatChanged { mode: self.repeat });
        self.repeat
    }

    // ===== Lyrics =====

    /// Fetch lyrics for a song, caching them onto the library entry
    pub async fn load_lyrics(&mut self, id: &SongId) -> Result<Option<String>> {
        let lyrics = self
            .store
            .song_lyrics(id)
            .await
            .map_err(|e| PlayerError::Storage(e.to_string()))?;

        if let Some(text) = &lyrics {
            if let Some(song) = self.library.iter_mut().find(|s| &s.id == id) {
                song.lyrics = Some(text.clone());
            }
        }
        Ok(lyrics)
    }

    /// Update a song's lyrics in memory and persist them
    pub fn set_lyrics(&mut self, id: &SongId, lyrics: String) -> Result<()> {
        let Some(song) = self.library.iter_mut().find(|s| &s.id == id) else {
            return Err(PlayerError::SongNotFound(id.clone()));
        };
        song.lyrics = Some(lyrics.clone());
        self.persist_lyrics(id.clone(), lyrics);
        Ok(())
    }

    // ===== Accessors =====

    /// Read-only snapshot of the library
    pub fn library(&self) -> &[Song] {
        &self.library
    }

    /// Read-only snapshot of the playlists
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Look up a playlist by id
    pub fn playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    /// The queued songs in play order
    pub fn queue(&self) -> &[Song] {
        self.queue.songs()
    }

    /// The playlist the queue was built from, if any
    pub fn queue_source_playlist(&self) -> Option<&PlaylistId> {
        self.queue.source_playlist()
    }

    /// The song currently loaded into the engine
    pub fn current_song(&self) -> Option<&Song> {
        self.transport.current()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.transport.state()
    }

    /// Current volume in `[0, 1]`
    pub fn volume(&self) -> f64 {
        self.transport.volume()
    }

    /// Last reported playback position
    pub fn position(&self) -> Duration {
        self.transport.position()
    }

    /// Duration of the loaded song, once known
    pub fn duration(&self) -> Option<Duration> {
        self.transport.duration()
    }

    /// Playback progress as a ratio of the duration
    pub fn progress(&self) -> f64 {
        self.transport.progress()
    }

    /// Whether shuffle selection is on
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    // ===== Persistence (fire-and-forget) =====

    fn persist_song(&self, song: Song) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.save_song(&song).await {
                tracing::warn!("failed to persist song {}: {err}", song.id);
            }
        });
    }

    fn persist_song_delete(&self, id: SongId) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.delete_song(&id).await {
                tracing::warn!("failed to delete song {id}: {err}");
            }
        });
    }

    fn persist_playlist(&self, playlist: Playlist) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.save_playlist(&playlist).await {
                tracing::warn!("failed to persist playlist {}: {err}", playlist.id);
            }
        });
    }

    fn persist_playlist_delete(&self, id: PlaylistId) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.delete_playlist(&id).await {
                tracing::warn!("failed to delete playlist {id}: {err}");
            }
        });
    }

    fn persist_lyrics(&self, id: SongId, lyrics: String) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.update_song_lyrics(&id, &lyrics).await {
                tracing::warn!("failed to persist lyrics for {id}: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCommand, MockEngine, NullStore};
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn song(id: &str) -> Song {
        let mut s = Song::new(format!("Song {id}"), PathBuf::from(format!("/m/{id}.mp3")));
        s.id = SongId::new(id);
        s
    }

    fn song_with(id: &str, title: &str, artist: &str, genre: &str) -> Song {
        let mut s = song(id);
        s.title = title.to_string();
        s.artist = Some(artist.to_string());
        s.genre = Some(genre.to_string());
        s
    }

    fn player() -> (Player, Arc<Mutex<Vec<EngineCommand>>>) {
        let engine = MockEngine::new();
        let commands = engine.commands();
        let player = Player::with_rng(
            Box::new(engine),
            Arc::new(NullStore),
            PlayerConfig::default(),
            StdRng::seed_from_u64(42),
        );
        (player, commands)
    }

    fn last_loaded(commands: &Arc<Mutex<Vec<EngineCommand>>>) -> Option<PathBuf> {
        commands
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|c| match c {
                EngineCommand::Load(path) => Some(path.clone()),
                _ => None,
            })
    }

    /// Walk the loaded song through ready -> playing, as an engine would
    fn settle_playing(player: &mut Player) {
        player.handle_engine_event(EngineEvent::Ready {
            duration: Duration::from_secs(180),
        });
        player.handle_engine_event(EngineEvent::Playing);
    }

    #[tokio::test]
    async fn sequential_next_reaches_end_and_stops() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b"), song("c")], None)
            .unwrap();
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/a.mp3")));

        player.next().unwrap();
        player.next().unwrap();
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/c.mp3")));
        settle_playing(&mut player);

        // End of queue with repeat off: engine stopped, current song kept,
        // queue untouched
        player.next().unwrap();
        assert!(matches!(
            commands.lock().unwrap().last(),
            Some(EngineCommand::Stop)
        ));
        assert_eq!(player.current_song().unwrap().id.as_str(), "c");
        assert_eq!(player.queue().len(), 3);
    }

    #[tokio::test]
    async fn repeat_all_wraps_to_queue_start() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b"), song("c")], None)
            .unwrap();
        player.toggle_repeat_mode(); // Off -> All

        player.next().unwrap();
        player.next().unwrap();
        player.next().unwrap();
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/a.mp3")));
    }

    #[tokio::test]
    async fn previous_stays_at_first_with_repeat_off() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b")], None)
            .unwrap();

        let loads_before = commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, EngineCommand::Load(_)))
            .count();

        player.previous().unwrap();

        let loads_after = commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, EngineCommand::Load(_)))
            .count();
        assert_eq!(loads_before, loads_after);
        assert_eq!(player.current_song().unwrap().id.as_str(), "a");
    }

    #[tokio::test]
    async fn end_of_media_advances_to_next_song() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b")], None)
            .unwrap();
        settle_playing(&mut player);

        player.handle_engine_event(EngineEvent::EndOfMedia);
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/b.mp3")));
    }

    #[tokio::test]
    async fn end_of_media_with_repeat_one_restarts_same_song() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b"), song("c")], None)
            .unwrap();
        player.next().unwrap(); // now at b
        settle_playing(&mut player);

        player.toggle_repeat_mode(); // All
        player.toggle_repeat_mode(); // One
        player.handle_engine_event(EngineEvent::EndOfMedia);

        // b again, not c - and shuffle must not interfere with a literal repeat
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/b.mp3")));
    }

    #[tokio::test]
    async fn end_of_media_at_queue_end_stops() {
        let (mut player, commands) = player();
        player
            .play_selected_songs(vec![song("a"), song("b")], None)
            .unwrap();
        player.next().unwrap();
        settle_playing(&mut player);

        player.handle_engine_event(EngineEvent::EndOfMedia);
        assert!(matches!(
            commands.lock().unwrap().last(),
            Some(EngineCommand::Stop)
        ));
        assert_eq!(player.current_song().unwrap().id.as_str(), "b");
    }

    #[tokio::test]
    async fn engine_error_reports_and_stops() {
        let (mut player, _) = player();
        let mut events = player.subscribe();
        player.play_now(song("a")).unwrap();

        player.handle_engine_event(EngineEvent::Error {
            message: "unplayable file".to_string(),
        });

        assert_eq!(player.state(), PlaybackState::Stopped);
        let mut saw_error = false;
        while let Ok(event) = events.try_recv() {
            if let PlayerEvent::PlaybackError { message } = event {
                assert_eq!(message, "unplayable file");
                saw_error = true;
            }
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn shuffle_next_never_repicks_current() {
        let (mut player, _) = player();
        player
            .play_selected_songs(vec![song("a"), song("b"), song("c"), song("d")], None)
            .unwrap();
        player.toggle_shuffle();

        for _ in 0..50 {
            let before = player.current_song().unwrap().id.clone();
            player.next().unwrap();
            let after = player.current_song().unwrap().id.clone();
            assert_ne!(before, after);
        }
    }

    #[tokio::test]
    async fn duplicate_library_add_is_rejected() {
        let (mut player, _) = player();
        player.add_song_to_library(song("a")).unwrap();

        let err = player.add_song_to_library(song("a")).unwrap_err();
        assert!(matches!(err, PlayerError::DuplicateSong(_)));
        assert_eq!(player.library().len(), 1);

        // Imported duplicates are skipped, not errors
        assert!(!player.add_imported_song(song("a")));
    }

    #[tokio::test]
    async fn removing_playing_song_clears_everything() {
        let (mut player, _) = player();
        let x = song("x");
        player.add_song_to_library(x.clone()).unwrap();
        player.add_song_to_library(song("y")).unwrap();

        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(vec![x.clone(), song("y")], &playlist_id)
            .unwrap();

        // x queued twice, y once
        player
            .play_selected_songs(vec![x.clone(), song("y"), x.clone()], None)
            .unwrap();
        settle_playing(&mut player);

        player.remove_song_from_library(&x.id).unwrap();

        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.current_song().is_none());
        assert!(player.library().iter().all(|s| s.id != x.id));
        assert!(player.queue().iter().all(|s| s.id != x.id));
        assert!(!player.playlist(&playlist_id).unwrap().contains(&x.id));
    }

    #[tokio::test]
    async fn play_playlist_from_song_takes_the_tail() {
        let (mut player, commands) = player();
        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(vec![song("a"), song("b"), song("c")], &playlist_id)
            .unwrap();

        player
            .play_playlist_from_song(&SongId::new("b"), &playlist_id)
            .unwrap();

        let queued: Vec<&str> = player.queue().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(queued, vec!["b", "c"]);
        assert_eq!(player.queue_source_playlist(), Some(&playlist_id));
        assert_eq!(last_loaded(&commands), Some(PathBuf::from("/m/b.mp3")));

        // A song not in the playlist leaves everything untouched
        player
            .play_playlist_from_song(&SongId::new("zz"), &playlist_id)
            .unwrap();
        assert_eq!(player.queue().len(), 2);
    }

    #[tokio::test]
    async fn play_now_clears_originating_playlist_only() {
        let (mut player, _) = player();
        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(vec![song("a"), song("b")], &playlist_id)
            .unwrap();
        player
            .play_playlist_from_song(&SongId::new("a"), &playlist_id)
            .unwrap();

        player.play_now(song("z")).unwrap();

        assert!(player.queue_source_playlist().is_none());
        // Queue contents untouched
        assert_eq!(player.queue().len(), 2);
        assert_eq!(player.current_song().unwrap().id.as_str(), "z");
    }

    #[tokio::test]
    async fn deleting_source_playlist_leaves_queue_playing() {
        let (mut player, _) = player();
        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(vec![song("a"), song("b")], &playlist_id)
            .unwrap();
        player
            .play_playlist_from_song(&SongId::new("a"), &playlist_id)
            .unwrap();

        player.delete_playlist(&playlist_id).unwrap();

        assert_eq!(player.queue().len(), 2);
        assert_eq!(player.current_song().unwrap().id.as_str(), "a");
        assert!(player.playlist(&playlist_id).is_none());
    }

    #[tokio::test]
    async fn blank_playlist_name_is_rejected() {
        let (mut player, _) = player();
        assert!(matches!(
            player.create_playlist("   ", None),
            Err(PlayerError::InvalidInput(_))
        ));
        assert!(player.playlists().is_empty());
    }

    #[tokio::test]
    async fn batch_moves_compose_without_clobbering() {
        let (mut player, _) = player();
        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(
                vec![song("a"), song("b"), song("c"), song("d")],
                &playlist_id,
            )
            .unwrap();

        player
            .move_songs_up(&[SongId::new("c"), SongId::new("b")], &playlist_id)
            .unwrap();
        let order: Vec<&str> = player
            .playlist(&playlist_id)
            .unwrap()
            .songs()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "c", "a", "d"]);

        player
            .move_songs_down(&[SongId::new("b"), SongId::new("c")], &playlist_id)
            .unwrap();
        let order: Vec<&str> = player
            .playlist(&playlist_id)
            .unwrap()
            .songs()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn single_move_round_trip_restores_order() {
        let (mut player, _) = player();
        let playlist_id = player.create_playlist("Mix", None).unwrap();
        player
            .add_songs_to_playlist(vec![song("a"), song("b"), song("c")], &playlist_id)
            .unwrap();

        player.move_song_up(&SongId::new("b"), &playlist_id).unwrap();
        player
            .move_song_down(&SongId::new("b"), &playlist_id)
            .unwrap();

        let order: Vec<&str> = player
            .playlist(&playlist_id)
            .unwrap()
            .songs()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_blank_returns_all() {
        let (mut player, _) = player();
        player
            .add_song_to_library(song_with("1", "Paranoid Android", "Radiohead", "Rock"))
            .unwrap();
        player
            .add_song_to_library(song_with("2", "So What", "Miles Davis", "Jazz"))
            .unwrap();

        assert_eq!(player.search_songs("").len(), 2);
        assert_eq!(player.search_songs("  ").len(), 2);

        let hits = player.search_songs("radioHEAD");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "1");

        assert_eq!(player.search_songs("jazz").len(), 1);
        assert_eq!(player.search_songs("nothing-matches").len(), 0);
    }

    #[tokio::test]
    async fn toggle_repeat_cycles_and_emits() {
        let (mut player, _) = player();
        let mut events = player.subscribe();

        assert_eq!(player.toggle_repeat_mode(), RepeatMode::All);
        assert_eq!(player.toggle_repeat_mode(), RepeatMode::One);
        assert_eq!(player.toggle_repeat_mode(), RepeatMode::Off);

        let mut modes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let PlayerEvent::RepeatChanged { mode } = event {
                modes.push(mode);
            }
        }
        assert_eq!(modes, vec![RepeatMode::All, RepeatMode::One, RepeatMode::Off]);
    }

    #[tokio::test]
    async fn shuffle_queue_keeps_contents() {
        let (mut player, _) = player();
        let songs: Vec<Song> = (0..8).map(|i| song(&format!("s{i}"))).collect();
        player.add_songs_to_queue(songs);

        player.shuffle_queue();

        assert_eq!(player.queue().len(), 8);
        let mut ids: Vec<&str> = player.queue().iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        let expected: Vec<String> = (0..8).map(|i| format!("s{i}")).collect();
        let mut expected: Vec<&str> = expected.iter().map(String::as_str).collect();
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn queue_removals_respect_occurrence_rules() {
        let (mut player, _) = player();
        player.add_songs_to_queue(vec![song("a"), song("b"), song("a")]);

        player.remove_song_from_queue(&SongId::new("a"));
        let order: Vec<&str> = player.queue().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);

        player.remove_songs_from_queue(&[SongId::new("a"), SongId::new("b")]);
        assert!(player.queue().is_empty());
    }

    #[tokio::test]
    async fn set_lyrics_updates_library_entry() {
        let (mut player, _) = player();
        player.add_song_to_library(song("a")).unwrap();

        player
            .set_lyrics(&SongId::new("a"), "la la la".to_string())
            .unwrap();
        assert_eq!(
            player.library()[0].lyrics.as_deref(),
            Some("la la la")
        );

        assert!(matches!(
            player.set_lyrics(&SongId::new("zz"), String::new()),
            Err(PlayerError::SongNotFound(_))
        ));
    }

    #[tokio::test]
    async fn volume_changes_emit_clamped_value() {
        let (mut player, _) = player();
        let mut events = player.subscribe();

        player.set_volume(2.0).unwrap();
        assert_eq!(player.volume(), 1.0);

        match events.try_recv() {
            Ok(PlayerEvent::VolumeChanged { volume }) => assert_eq!(volume, 1.0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn next_on_empty_queue_is_noop() {
        let (mut player, commands) = player();
        player.next().unwrap();
        player.previous().unwrap();
        // Only the initial volume command
        assert_eq!(commands.lock().unwrap().len(), 1);
    }
}
