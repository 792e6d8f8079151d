//! Aria Player - Playback Orchestration
//!
//! Platform-agnostic playback orchestration for Aria Player.
//!
//! This crate provides:
//! - The playback state machine (`Transport`) over an opaque engine
//! - Queue navigation under shuffle and repeat modes
//! - The `Player` controller for library, playlist, and queue mutation
//! - Typed player events with explicit channel subscription
//!
//! # Architecture
//!
//! The audio engine is consumed through the [`PlaybackEngine`] trait and
//! reports back with [`EngineEvent`]s. The application owns a single
//! interaction context (one task or thread) that holds the [`Player`],
//! drains the engine's event channel into [`Player::handle_engine_event`],
//! and feeds import results into [`Player::add_imported_song`]. Nothing
//! else mutates player state, so no locking is needed beyond that
//! single-writer discipline.
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_playback::{EngineEvent, PlaybackEngine, Player, PlayerConfig};
//! use aria_core::LibraryStore;
//! use std::sync::Arc;
//!
//! # fn demo(engine: Box<dyn PlaybackEngine>, store: Arc<dyn LibraryStore>,
//! #         engine_events: tokio::sync::mpsc::UnboundedReceiver<EngineEvent>) {
//! # let mut engine_events = engine_events;
//! let mut player = Player::new(engine, store, PlayerConfig::default());
//! let _events = player.subscribe();
//!
//! // Interaction loop: user commands and engine events, one context
//! tokio::spawn(async move {
//!     while let Some(event) = engine_events.recv().await {
//!         player.handle_engine_event(event);
//!     }
//! });
//! # }
//! ```

mod engine;
mod error;
mod events;
pub mod navigator;
mod player;
mod queue;
mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Public exports
pub use engine::{EngineEvent, PlaybackEngine};
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use player::Player;
pub use queue::PlayQueue;
pub use transport::Transport;
pub use types::{PlaybackState, PlayerConfig, RepeatMode};
