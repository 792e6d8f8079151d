//! Aria Player Import
//!
//! Background ingestion of audio files into the library.
//!
//! A batch filters candidate paths to supported audio extensions, extracts
//! metadata per file (falling back to filename-derived records for
//! unreadable files - a single bad file never aborts the batch), and
//! streams the produced songs plus progress counters over a channel. The
//! interaction context drains that channel and performs the actual library
//! writes, keeping mutation single-writer.
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_import::{ImportMessage, ImportPipeline};
//! use aria_metadata::LoftyExtractor;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> aria_import::Result<()> {
//! let pipeline = ImportPipeline::new(Arc::new(LoftyExtractor::new()));
//! let (mut rx, handle) = pipeline.import_directory(Path::new("/music"))?;
//!
//! while let Some(message) = rx.recv().await {
//!     if let ImportMessage::Imported(song) = message {
//!         // hand the song to Player::add_imported_song on the
//!         // interaction context
//!         println!("imported {}", song.display_label());
//!     }
//! }
//! let summary = handle.await.expect("import task panicked");
//! println!("{} of {} imported", summary.imported, summary.total);
//! # Ok(())
//! # }
//! ```

mod error;
mod pipeline;
mod types;

pub use error::{ImportError, Result};
pub use pipeline::ImportPipeline;
pub use types::{ImportMessage, ImportProgress, ImportSummary};
