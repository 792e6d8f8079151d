//! Playback state machine
//!
//! Wraps the engine behind the four-state machine (Stopped, Loading,
//! Playing, Paused). Commands are validated here; actual state changes
//! happen when the engine reports back through `EngineEvent`s, which the
//! interaction context feeds into `handle_event`.

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::{PlayerError, Result};
use crate::types::PlaybackState;
use aria_core::types::Song;
use std::time::Duration;

/// Outcome of applying an engine event, for the controller to act on
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TransportUpdate {
    /// Nothing the controller needs to react to
    None,

    /// The machine moved to a new state
    StateChanged(PlaybackState),

    /// Playback position advanced
    PositionChanged(Duration),

    /// The song played through to its end; state is now Stopped and the
    /// controller should run automatic advance
    Finished,

    /// The engine failed; state is now Stopped
    Failed(String),
}

/// The playback state machine
pub struct Transport {
    engine: Box<dyn PlaybackEngine>,
    state: PlaybackState,
    current: Option<Song>,
    duration: Option<Duration>,
    position: Duration,
    volume: f64,
    // play() issued while loading; honored on Ready
    pending_play: bool,
}

impl Transport {
    /// Create a transport around an engine, applying the initial volume
    pub fn new(mut engine: Box<dyn PlaybackEngine>, volume: f64) -> Self {
        let volume = volume.clamp(0.0, 1.0);
        if let Err(err) = engine.set_volume(volume) {
            tracing::warn!("engine rejected initial volume: {err}");
        }
        Self {
            engine,
            state: PlaybackState::Stopped,
            current: None,
            duration: None,
            position: Duration::ZERO,
            volume,
            pending_play: false,
        }
    }

    /// Begin loading a song, replacing whatever is current
    pub fn load(&mut self, song: Song) -> Result<()> {
        if let Err(err) = self.engine.load(&song.file_path) {
            self.state = PlaybackState::Stopped;
            self.current = None;
            self.duration = None;
            self.pending_play = false;
            return Err(PlayerError::Engine(err.to_string()));
        }
        self.current = Some(song);
        self.duration = None;
        self.position = Duration::ZERO;
        self.pending_play = false;
        self.state = PlaybackState::Loading;
        Ok(())
    }

    /// Start or resume playback
    ///
    /// No-op when nothing is loaded. While loading, the intent is recorded
    /// and the engine is started once it reports ready.
    pub fn play(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        match self.state {
            PlaybackState::Loading => {
                self.pending_play = true;
                Ok(())
            }
            PlaybackState::Stopped | PlaybackState::Paused => self
                .engine
                .play()
                .map_err(|e| PlayerError::Engine(e.to_string())),
            PlaybackState::Playing => Ok(()),
        }
    }

    /// Pause playback; only meaningful while playing
    pub fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        self.engine
            .pause()
            .map_err(|e| PlayerError::Engine(e.to_string()))
    }

    /// Stop playback; always a safe no-op when nothing is loaded
    pub fn stop(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        self.pending_play = false;
        self.engine
            .stop()
            .map_err(|e| PlayerError::Engine(e.to_string()))
    }

    /// Stop the engine and forget the current song
    ///
    /// Used when the current song is removed from under the player; the
    /// machine resets synchronously so callers observe Stopped immediately,
    /// and the engine's own Stopped event later is absorbed idempotently.
    pub fn clear(&mut self) {
        if self.current.is_some() {
            if let Err(err) = self.engine.stop() {
                tracing::warn!("engine stop during clear failed: {err}");
            }
        }
        self.current = None;
        self.duration = None;
        self.position = Duration::ZERO;
        self.pending_play = false;
        self.state = PlaybackState::Stopped;
    }

    /// Seek to a ratio of the total duration
    ///
    /// Ignored until the duration is known (the engine has reported ready);
    /// the ratio is clamped to `[0, 1]`.
    pub fn seek(&mut self, ratio: f64) -> Result<()> {
        if self.duration.is_none() {
            return Ok(());
        }
        self.engine
            .seek(ratio.clamp(0.0, 1.0))
            .map_err(|e| PlayerError::Engine(e.to_string()))
    }

    /// Set the volume, forwarded to the engine immediately in any state
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);
        self.engine
            .set_volume(self.volume)
            .map_err(|e| PlayerError::Engine(e.to_string()))
    }

    /// Apply an engine lifecycle event to the machine
    pub(crate) fn handle_event(&mut self, event: EngineEvent) -> TransportUpdate {
        match event {
            EngineEvent::Ready { duration } => {
                self.duration = Some(duration);
                self.state = PlaybackState::Stopped;
                if self.pending_play {
                    self.pending_play = false;
                    if let Err(err) = self.engine.play() {
                        return TransportUpdate::Failed(err.to_string());
                    }
                }
                TransportUpdate::StateChanged(PlaybackState::Stopped)
            }
            EngineEvent::Playing => {
                self.state = PlaybackState::Playing;
                TransportUpdate::StateChanged(PlaybackState::Playing)
            }
            EngineEvent::Paused => {
                self.state = PlaybackState::Paused;
                TransportUpdate::StateChanged(PlaybackState::Paused)
            }
            EngineEvent::Stopped => {
                self.state = PlaybackState::Stopped;
                self.position = Duration::ZERO;
                TransportUpdate::StateChanged(PlaybackState::Stopped)
            }
            EngineEvent::Progress { position } => {
                self.position = position;
                TransportUpdate::PositionChanged(position)
            }
            EngineEvent::EndOfMedia => {
                self.state = PlaybackState::Stopped;
                TransportUpdate::Finished
            }
            EngineEvent::Error { message } => {
                self.state = PlaybackState::Stopped;
                self.pending_play = false;
                TransportUpdate::Failed(message)
            }
        }
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The song currently loaded into the engine, if any
    pub fn current(&self) -> Option<&Song> {
        self.current.as_ref()
    }

    /// Total duration of the loaded media, known after the ready event
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Last reported playback position
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Current volume in `[0, 1]`
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Playback progress as a ratio of the total duration
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
