//! Aria Player Metadata
//!
//! Tag extraction for audio files, behind `aria_core::MetadataExtractor`.
//!
//! Extraction produces a full `Song` with a fresh id; files that cannot be
//! parsed are errors, and the import pipeline decides the fallback policy
//! (filename-derived titles with placeholder artist/album).
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_metadata::LoftyExtractor;
//! use aria_core::MetadataExtractor;
//! use std::path::Path;
//!
//! # fn example() -> aria_core::Result<()> {
//! let extractor = LoftyExtractor::new();
//! if extractor.supports(Path::new("/music/song.mp3")) {
//!     let song = extractor.extract(Path::new("/music/song.mp3"))?;
//!     println!("{}", song.display_label());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod extractor;

pub use error::{MetadataError, Result};
pub use extractor::{title_from_filename, LoftyExtractor, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
