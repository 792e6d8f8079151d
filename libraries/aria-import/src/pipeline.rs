//! Import pipeline orchestration
//!
//! Turns candidate file paths into `Song`s off the interaction context.
//! Workers only extract metadata; the produced songs travel back over a
//! channel so the interaction context performs every library write itself.

use crate::error::{ImportError, Result};
use crate::types::{ImportMessage, ImportProgress, ImportSummary};
use aria_core::types::Song;
use aria_core::MetadataExtractor;
use aria_metadata::{title_from_filename, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the progress/result channel
const CHANNEL_CAPACITY: usize = 100;

/// Background ingestion of audio files into `Song` records
pub struct ImportPipeline {
    extractor: Arc<dyn MetadataExtractor>,
}

impl ImportPipeline {
    /// Create a pipeline around a metadata extractor
    pub fn new(extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self { extractor }
    }

    /// Recursively collect supported audio files under a directory
    pub fn collect_audio_files(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(directory).follow_links(false) {
            let entry = entry.map_err(|e| ImportError::Scan(e.to_string()))?;
            if entry.file_type().is_file() && self.extractor.supports(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Import every supported audio file under a directory
    pub fn import_directory(
        &self,
        directory: &Path,
    ) -> Result<(
        mpsc::Receiver<ImportMessage>,
        tokio::task::JoinHandle<ImportSummary>,
    )> {
        let files = self.collect_audio_files(directory)?;
        Ok(self.import_files(files))
    }

    /// Import specific files
    ///
    /// Unsupported extensions are filtered out. Returns a channel carrying
    /// produced songs and progress updates, and a handle resolving to the
    /// batch summary. The batch is not cancellable; it runs to completion
    /// file-by-file.
    pub fn import_files(
        &self,
        files: Vec<PathBuf>,
    ) -> (
        mpsc::Receiver<ImportMessage>,
        tokio::task::JoinHandle<ImportSummary>,
    ) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let extractor = Arc::clone(&self.extractor);

        let handle = tokio::spawn(async move { run_batch(files, extractor, tx).await });

        (rx, handle)
    }
}

async fn run_batch(
    files: Vec<PathBuf>,
    extractor: Arc<dyn MetadataExtractor>,
    tx: mpsc::Sender<ImportMessage>,
) -> ImportSummary {
    let candidates: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| extractor.supports(path))
        .collect();

    let mut progress = ImportProgress::new(candidates.len());
    let _ = tx.send(ImportMessage::Progress(progress.clone())).await;

    for path in candidates {
        if !path.is_file() {
            tracing::warn!("skipping missing import candidate {}", path.display());
            progress.failed += 1;
            progress.processed += 1;
            let _ = tx.send(ImportMessage::Progress(progress.clone())).await;
            continue;
        }

        let song = match extractor.extract(&path) {
            Ok(song) => {
                progress.imported += 1;
                song
            }
            Err(err) => {
                // One bad file must not abort the batch
                tracing::warn!(
                    "metadata extraction failed for {}: {err}; using filename fallback",
                    path.display()
                );
                progress.fell_back += 1;
                fallback_song(&path)
            }
        };
        progress.processed += 1;

        let _ = tx.send(ImportMessage::Imported(song)).await;
        let _ = tx.send(ImportMessage::Progress(progress.clone())).await;
    }

    tracing::info!(
        "import batch done: {} imported, {} fell back, {} failed of {}",
        progress.imported,
        progress.fell_back,
        progress.failed,
        progress.total
    );
    ImportSummary::from(progress)
}

/// Song built from the file name alone, for files with unreadable metadata
fn fallback_song(path: &Path) -> Song {
    let mut song = Song::new(title_from_filename(path), path.to_path_buf());
    song.artist = Some(UNKNOWN_ARTIST.to_string());
    song.album = Some(UNKNOWN_ALBUM.to_string());
    song
}
