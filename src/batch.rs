//! Batch orchestrator: plan, transcribe, and write, one file at a time

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::Transcribe;
use crate::config::TranscriptionOptions;
use crate::error::{Result, ScribeError};
use crate::format::{self, OutputFormat};
use crate::sync::SyncPlanner;

/// Outcome of one batch item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub media_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub status: SyncStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    Completed,
    Failed,
}

/// Overall batch sync results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl SyncReport {
    fn empty() -> Self {
        Self {
            total: 0,
            successful: 0,
            failed: 0,
            outcomes: Vec::new(),
        }
    }
}

/// Drives the end-to-end sync: planner, transcription client, format writer.
///
/// Items are processed strictly sequentially; one file's failure never
/// aborts the rest of the batch.
pub struct BatchSync<T: Transcribe> {
    transcriber: T,
    planner: SyncPlanner,
    options: TranscriptionOptions,
}

impl<T: Transcribe> BatchSync<T> {
    pub fn new(transcriber: T, options: TranscriptionOptions) -> Self {
        Self {
            transcriber,
            planner: SyncPlanner::new(),
            options,
        }
    }

    /// Transcribe every media file that lacks a transcript
    pub async fn run(
        &self,
        media_dir: &Path,
        transcripts_dir: &Path,
        output_format: OutputFormat,
    ) -> Result<SyncReport> {
        info!("🎵 Automated transcription sync (audio & video)");

        let plan = self.planner.plan(media_dir, transcripts_dir).await?;
        info!(
            "📁 Found {} media files in '{}', {} transcripts in '{}'",
            plan.media_total,
            media_dir.display(),
            plan.transcript_total,
            transcripts_dir.display()
        );

        if plan.media_total == 0 {
            info!("No audio or video files found in '{}'", media_dir.display());
            return Ok(SyncReport::empty());
        }

        if plan.is_empty() {
            info!("✅ All media files already have transcripts");
            return Ok(SyncReport::empty());
        }

        info!("🔄 {} files need transcription", plan.pending.len());

        let total = plan.pending.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, media_path) in plan.pending.iter().enumerate() {
            info!(
                "🎯 Processing {}/{}: {}",
                index + 1,
                total,
                media_path.display()
            );

            let outcome = self
                .process_one(media_path, transcripts_dir, output_format)
                .await?;
            outcomes.push(outcome);
        }

        let successful = outcomes
            .iter()
            .filter(|o| o.status == SyncStatus::Completed)
            .count();
        let failed = outcomes.len() - successful;

        info!("📊 Transcription summary: {} successful, {} failed, {} total", successful, failed, total);

        Ok(SyncReport {
            total,
            successful,
            failed,
            outcomes,
        })
    }

    /// Transcribe one explicit input file, bypassing the planner. The file is
    /// (re-)transcribed even when a transcript already exists.
    pub async fn transcribe_single(
        &self,
        input: &Path,
        output_dir: &Path,
        output_format: OutputFormat,
    ) -> Result<PathBuf> {
        if !input.exists() {
            return Err(ScribeError::MediaNotFound(input.to_path_buf()));
        }

        info!("🎯 Transcribing single file: {}", input.display());
        let result = self.transcriber.transcribe_file(input, &self.options).await?;
        format::print_result(&result);

        let output_path = Self::output_path(input, output_dir, output_format);
        format::write_transcript(&result, &output_path, output_format).await?;
        info!("✅ Transcript saved to: {}", output_path.display());

        Ok(output_path)
    }

    async fn process_one(
        &self,
        media_path: &Path,
        transcripts_dir: &Path,
        output_format: OutputFormat,
    ) -> Result<FileOutcome> {
        match self.transcriber.transcribe_file(media_path, &self.options).await {
            Ok(result) => {
                format::print_result(&result);

                let output_path = Self::output_path(media_path, transcripts_dir, output_format);
                match format::write_transcript(&result, &output_path, output_format).await {
                    Ok(()) => {
                        info!("   ✅ Saved transcript: {}", output_path.display());
                        Ok(FileOutcome {
                            media_path: media_path.to_path_buf(),
                            output_path: Some(output_path),
                            status: SyncStatus::Completed,
                            error_message: None,
                        })
                    }
                    Err(e) => {
                        warn!("   ❌ Failed to write transcript for {}: {}", media_path.display(), e);
                        Ok(FileOutcome {
                            media_path: media_path.to_path_buf(),
                            output_path: None,
                            status: SyncStatus::Failed,
                            error_message: Some(e.to_string()),
                        })
                    }
                }
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("   ❌ Transcription failed for {}: {}", media_path.display(), e);
                Ok(FileOutcome {
                    media_path: media_path.to_path_buf(),
                    output_path: None,
                    status: SyncStatus::Failed,
                    error_message: Some(e.to_string()),
                })
            }
        }
    }

    /// Output filename: same stem as the media file, format extension
    fn output_path(media_path: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
        let stem = media_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "transcript".to_string());
        output_dir.join(format!("{}.{}", stem, format.extension()))
    }
}
