//! API request handlers

use serde_json::Value;
use std::path::Path;
use tracing::info;

use super::models::SaveTranscriptResponse;
use crate::client::TranscriptionClient;
use crate::config::{ApiConfig, Config};
use crate::error::Result;

/// Handle health check requests
pub fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "scribe-sync",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Transcribe an uploaded media file.
///
/// The request credential takes precedence over the configured one. On
/// success the upload is also archived into the media directory so a later
/// batch run sees it.
pub async fn transcribe_upload(
    config: &Config,
    api_key: Option<String>,
    filename: &str,
    file_bytes: Vec<u8>,
) -> Result<Value> {
    let client = TranscriptionClient::new(ApiConfig {
        api_key: api_key.or_else(|| config.api.api_key.clone()),
        endpoint: config.api.endpoint.clone(),
    })?;

    // Keep the original extension so the service can sniff the container
    let suffix = Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let temp_file = tempfile::Builder::new().suffix(&suffix).tempfile()?;
    tokio::fs::write(temp_file.path(), &file_bytes).await?;

    let result = client
        .transcribe_file(temp_file.path(), &config.transcription)
        .await?;

    tokio::fs::create_dir_all(&config.sync.media_dir).await?;
    let archived = config.sync.media_dir.join(filename);
    tokio::fs::write(&archived, &file_bytes).await?;
    info!("📁 Archived upload to: {}", archived.display());

    Ok(serde_json::to_value(&result)?)
}

/// Persist a transcript document as `<stem>.json` in the transcripts dir
pub async fn save_transcript(
    config: &Config,
    filename: &str,
    transcript: &Value,
) -> Result<SaveTranscriptResponse> {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());

    tokio::fs::create_dir_all(&config.sync.transcripts_dir).await?;
    let transcript_path = config.sync.transcripts_dir.join(format!("{}.json", stem));

    let content = serde_json::to_string_pretty(transcript)?;
    tokio::fs::write(&transcript_path, content).await?;
    info!("💾 Transcript saved to: {}", transcript_path.display());

    Ok(SaveTranscriptResponse {
        message: "Transcript saved successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_health_check_shape() {
        let body = health_check();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "scribe-sync");
    }

    #[tokio::test]
    async fn test_save_transcript_uses_media_stem() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .with_transcripts_dir(temp_dir.path().join("transcripts"))
            .build();

        let transcript = serde_json::json!({"text": "hello", "words": []});
        let response = save_transcript(&config, "meeting.mp3", &transcript)
            .await
            .unwrap();

        assert_eq!(response.message, "Transcript saved successfully");
        let saved = temp_dir.path().join("transcripts").join("meeting.json");
        let content = tokio::fs::read_to_string(&saved).await.unwrap();
        let back: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(back["text"], "hello");
    }

    #[tokio::test]
    async fn test_transcribe_upload_requires_credential() {
        let config = ConfigBuilder::new().build();
        let err = transcribe_upload(&config, None, "clip.mp3", vec![0u8; 4])
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ScribeError::MissingApiKey));
    }
}
