//! API data models

use serde::{Deserialize, Serialize};

/// API error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Request body for saving a transcript produced elsewhere
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveTranscriptRequest {
    /// Media filename the transcript belongs to; the saved file reuses its
    /// stem with a .json extension
    pub filename: String,
    /// Transcript document to persist
    pub transcript: serde_json::Value,
}

/// Confirmation body for successful save-transcript calls
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveTranscriptResponse {
    pub message: String,
}
