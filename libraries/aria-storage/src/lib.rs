//! Aria Player Storage
//!
//! `SQLite` persistence for the music library: songs, playlists with their
//! ordered membership, and per-song lyrics.
//!
//! The store is consumed through `aria_core::LibraryStore`; the player
//! treats every write as fire-and-forget, so failures here are logged by
//! the caller and never interrupt playback.
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_storage::SqliteLibraryStore;
//! use aria_core::LibraryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteLibraryStore::connect("sqlite://aria.db").await?;
//! let songs = store.get_all_songs().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

pub use error::{Result, StorageError};
pub use store::SqliteLibraryStore;
