//! Test doubles shared by the in-crate test modules

use crate::engine::PlaybackEngine;
use aria_core::{AriaError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A command the mock engine received
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCommand {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(f64),
    SetVolume(f64),
}

/// Engine double that records every command
///
/// Lifecycle events are not synthesized; tests feed `EngineEvent`s to the
/// transport/player directly, mirroring how a real engine reports back
/// asynchronously.
pub(crate) struct MockEngine {
    commands: Arc<Mutex<Vec<EngineCommand>>>,
    fail_load: bool,
}

impl MockEngine {
    pub(crate) fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            fail_load: false,
        }
    }

    /// An engine whose `load` always fails
    pub(crate) fn failing_load() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            fail_load: true,
        }
    }

    /// Shared handle to the recorded command log
    pub(crate) fn commands(&self) -> Arc<Mutex<Vec<EngineCommand>>> {
        Arc::clone(&self.commands)
    }

    fn record(&self, command: EngineCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

impl PlaybackEngine for MockEngine {
    fn load(&mut self, path: &Path) -> Result<()> {
        if self.fail_load {
            return Err(AriaError::engine(format!(
                "cannot open {}",
                path.display()
            )));
        }
        self.record(EngineCommand::Load(path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.record(EngineCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(EngineCommand::Pause);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.record(EngineCommand::Stop);
        Ok(())
    }

    fn seek(&mut self, ratio: f64) -> Result<()> {
        self.record(EngineCommand::Seek(ratio));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.record(EngineCommand::SetVolume(volume));
        Ok(())
    }
}

/// Store double that accepts everything and remembers nothing
pub(crate) struct NullStore;

#[async_trait::async_trait]
impl aria_core::LibraryStore for NullStore {
    async fn save_song(&self, _song: &aria_core::Song) -> Result<()> {
        Ok(())
    }

    async fn delete_song(&self, _id: &aria_core::SongId) -> Result<()> {
        Ok(())
    }

    async fn get_all_songs(&self) -> Result<Vec<aria_core::Song>> {
        Ok(Vec::new())
    }

    async fn save_playlist(&self, _playlist: &aria_core::Playlist) -> Result<()> {
        Ok(())
    }

    async fn delete_playlist(&self, _id: &aria_core::PlaylistId) -> Result<()> {
        Ok(())
    }

    async fn get_all_playlists(&self) -> Result<Vec<aria_core::Playlist>> {
        Ok(Vec::new())
    }

    async fn song_lyrics(&self, _id: &aria_core::SongId) -> Result<Option<String>> {
        Ok(None)
    }

    async fn update_song_lyrics(&self, _id: &aria_core::SongId, _lyrics: &str) -> Result<()> {
        Ok(())
    }
}
