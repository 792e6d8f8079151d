//! Player events
//!
//! Typed change notifications emitted by the player. Consumers (UI, tests)
//! subscribe explicitly and receive events over a channel; there is no
//! implicit property binding. A subscriber that drops its receiver is
//! pruned on the next emission.

use crate::types::{PlaybackState, RepeatMode};
use aria_core::types::Song;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events emitted by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// The current song changed (or was cleared)
    SongChanged {
        /// The song now loaded, if any
        song: Option<Song>,
    },

    /// Playback position report
    PositionChanged {
        /// Current playback position
        position: Duration,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume in `[0, 1]`
        volume: f64,
    },

    /// Queue contents changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Library contents changed
    LibraryChanged {
        /// New library size
        size: usize,
    },

    /// Playlist set or some playlist's contents changed
    PlaylistsChanged,

    /// Shuffle flag flipped
    ShuffleChanged {
        /// Whether shuffle selection is now on
        enabled: bool,
    },

    /// Repeat mode cycled
    RepeatChanged {
        /// The new repeat mode
        mode: RepeatMode,
    },

    /// A non-fatal playback failure
    PlaybackError {
        /// Human-readable failure description
        message: String,
    },
}

/// Subscriber list fanning events out over unbounded channels
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<PlayerEvent>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and hand back its receiving end
    pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, dropping dead ones
    pub(crate) fn emit(&mut self, event: &PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
