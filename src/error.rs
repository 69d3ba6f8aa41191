//! Error types for scribe-sync operations

use std::path::PathBuf;

/// Result type for scribe-sync operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Error types for scribe-sync operations
#[derive(thiserror::Error, Debug)]
pub enum ScribeError {
    #[error("Media file not found: {0}")]
    MediaNotFound(PathBuf),

    #[error("API key not configured. Set it in the config file or the ELEVENLABS_API_KEY environment variable")]
    MissingApiKey,

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown output format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ScribeError {
    /// Whether this error should abort the whole batch rather than being
    /// tallied as a single-file failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScribeError::MissingApiKey | ScribeError::Configuration(_))
    }
}
