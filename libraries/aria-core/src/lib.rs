//! Aria Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Aria Player.
//!
//! This crate provides the foundational building blocks shared by the
//! playback, storage, metadata, and import crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist`, and their id newtypes
//! - **Core Traits**: `LibraryStore`, `MetadataExtractor`
//! - **Error Handling**: Unified `AriaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use aria_core::types::{Song, Playlist};
//! use std::path::PathBuf;
//!
//! let song = Song::new("My Favorite Song", PathBuf::from("/music/song.mp3"));
//!
//! let mut playlist = Playlist::new("Road Trip");
//! playlist.add_song(song);
//! assert_eq!(playlist.len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{AriaError, Result};
pub use traits::{LibraryStore, MetadataExtractor};
pub use types::{Playlist, PlaylistId, Song, SongId};
