//! Playback engine seam
//!
//! The audio decode/output component is external to this crate. It is
//! consumed through the `PlaybackEngine` trait and reports back through
//! `EngineEvent`s that the application must marshal onto the interaction
//! context (see `Player::handle_engine_event`).

use aria_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Transport-level commands understood by the audio engine
///
/// Commands are non-blocking; the engine acknowledges them asynchronously
/// via `EngineEvent`s.
pub trait PlaybackEngine: Send {
    /// Begin loading the file at `path`, replacing any current media
    ///
    /// # Errors
    /// Returns an error if the load cannot even be started (for example the
    /// file does not exist); decode failures surface later as
    /// `EngineEvent::Error`.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start or resume playback of the loaded media
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Stop playback and rewind to the start
    fn stop(&mut self) -> Result<()>;

    /// Seek to `ratio` of the total duration, `ratio` in `[0, 1]`
    fn seek(&mut self, ratio: f64) -> Result<()>;

    /// Set the output volume, `volume` in `[0, 1]`
    fn set_volume(&mut self, volume: f64) -> Result<()>;
}

/// Lifecycle events reported by the engine
///
/// Implementations deliver these through a channel owned by the
/// application; the interaction context drains the channel and feeds each
/// event to the player. They are the only asynchronous playback inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Media finished loading; total duration is now known
    Ready {
        /// Total duration of the loaded media
        duration: Duration,
    },

    /// Playback started
    Playing,

    /// Playback paused
    Paused,

    /// Playback stopped; position has been reset
    Stopped,

    /// Periodic position report while playing
    Progress {
        /// Current playback position
        position: Duration,
    },

    /// The media played through to its end
    EndOfMedia,

    /// The engine failed; non-fatal, playback is simply stopped
    Error {
        /// Human-readable failure description
        message: String,
    },
}
