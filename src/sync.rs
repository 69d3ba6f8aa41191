//! Sync planner: decides which media files still need a transcript

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;

/// Audio and video extensions the archiver will transcribe
pub const MEDIA_EXTENSIONS: &[&str] = &[
    // Audio
    "mp3", "wav", "m4a", "flac", "aac", "ogg", "wma", "aiff",
    // Video
    "mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "m4v",
];

/// Extensions that count as an existing transcript
pub const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "json", "srt", "vtt"];

/// Result of comparing the media library with the transcript archive
#[derive(Debug, Clone)]
pub struct SyncPlan {
    /// Media files with no matching transcript, sorted by filename
    pub pending: Vec<PathBuf>,
    /// Total media files found
    pub media_total: usize,
    /// Total transcript files found
    pub transcript_total: usize,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Scans the media and transcript directories and plans what to transcribe
#[derive(Debug, Clone, Default)]
pub struct SyncPlanner;

impl SyncPlanner {
    pub fn new() -> Self {
        Self
    }

    /// List media files in a directory, creating it when absent.
    ///
    /// Non-recursive by contract; results are sorted by filename so batch
    /// order is deterministic across platforms.
    pub async fn scan_media_files(&self, media_dir: &Path) -> Result<Vec<PathBuf>> {
        self.scan_directory(media_dir, MEDIA_EXTENSIONS).await
    }

    /// List transcript files in a directory, creating it when absent
    pub async fn scan_transcript_files(&self, transcripts_dir: &Path) -> Result<Vec<PathBuf>> {
        self.scan_directory(transcripts_dir, TRANSCRIPT_EXTENSIONS).await
    }

    async fn scan_directory(&self, dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            info!("📁 Directory '{}' does not exist, creating it", dir.display());
            tokio::fs::create_dir_all(dir).await?;
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if extensions.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Determine which media files lack a transcript.
    ///
    /// A media file matches a transcript when their stems are equal; the
    /// transcript's extension and directory are irrelevant.
    pub async fn plan(&self, media_dir: &Path, transcripts_dir: &Path) -> Result<SyncPlan> {
        let media_files = self.scan_media_files(media_dir).await?;
        let transcript_files = self.scan_transcript_files(transcripts_dir).await?;

        let transcript_stems: HashSet<String> = transcript_files
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .collect();

        let pending: Vec<PathBuf> = media_files
            .iter()
            .filter(|path| {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                !transcript_stems.contains(&stem)
            })
            .cloned()
            .collect();

        debug!(
            "Planned sync: {} media, {} transcripts, {} pending",
            media_files.len(),
            transcript_files.len(),
            pending.len()
        );

        Ok(SyncPlan {
            pending,
            media_total: media_files.len(),
            transcript_total: transcript_files.len(),
        })
    }
}
