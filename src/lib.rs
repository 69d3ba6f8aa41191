//! Scribe Sync - batch speech-to-text archiver
//!
//! Keeps a local transcript archive in sync with a media library: scans for
//! audio/video files lacking transcripts, sends them to an external
//! speech-to-text API, and writes the results as JSON, plain text, or SRT.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod sync;
pub mod transcript;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::batch::{BatchSync, FileOutcome, SyncReport, SyncStatus};
pub use crate::client::{Transcribe, TranscriptionClient};
pub use crate::config::{ApiConfig, Config, ConfigBuilder, TranscriptionOptions};
pub use crate::error::{Result, ScribeError};
pub use crate::format::{format_time, OutputFormat};
pub use crate::sync::{SyncPlan, SyncPlanner};
pub use crate::transcript::{TranscriptionResult, Word, WordType};

#[cfg(feature = "api")]
pub use crate::api::ApiServer;
