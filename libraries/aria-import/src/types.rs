//! Import progress reporting types

use aria_core::types::Song;
use serde::{Deserialize, Serialize};

/// Running counts for an import batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Number of candidate files after extension filtering
    pub total: usize,

    /// Files handled so far (imported, fell back, or failed)
    pub processed: usize,

    /// Files whose metadata extracted cleanly
    pub imported: usize,

    /// Files that fell back to filename-derived metadata
    pub fell_back: usize,

    /// Files that could not produce a song at all (missing/unreadable path)
    pub failed: usize,
}

impl ImportProgress {
    /// Start counting a batch of `total` candidates
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Whether every candidate has been handled
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Final accounting for a finished batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Number of candidate files after extension filtering
    pub total: usize,

    /// Files whose metadata extracted cleanly
    pub imported: usize,

    /// Files that fell back to filename-derived metadata
    pub fell_back: usize,

    /// Files that produced no song
    pub failed: usize,
}

impl From<ImportProgress> for ImportSummary {
    fn from(progress: ImportProgress) -> Self {
        Self {
            total: progress.total,
            imported: progress.imported,
            fell_back: progress.fell_back,
            failed: progress.failed,
        }
    }
}

/// Messages delivered over the import channel
///
/// `Imported` carries each produced song to the interaction context, which
/// feeds it into the player (the single writer for library state).
#[derive(Debug, Clone)]
pub enum ImportMessage {
    /// A song is ready to be added to the library
    Imported(Song),

    /// Updated batch counters
    Progress(ImportProgress),
}
