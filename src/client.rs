//! Client for the external speech-to-text API

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{ApiConfig, TranscriptionOptions};
use crate::error::{Result, ScribeError};
use crate::transcript::TranscriptionResult;

/// Seam for transcription backends, so the batch layer can be exercised
/// without network access.
#[async_trait]
pub trait Transcribe: Send + Sync {
    async fn transcribe_file(
        &self,
        media_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult>;
}

/// HTTP client for an ElevenLabs-style speech-to-text endpoint
#[derive(Debug)]
pub struct TranscriptionClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl TranscriptionClient {
    /// Create a client from connection settings.
    ///
    /// The credential is required up front; without it no file can be
    /// transcribed, so this is the one fatal configuration error.
    pub fn new(api: ApiConfig) -> Result<Self> {
        let api_key = match api.api_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ScribeError::MissingApiKey),
        };

        Ok(Self {
            endpoint: api.endpoint,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    /// Upload a local media file for transcription
    pub async fn transcribe_file(
        &self,
        media_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        if !media_path.exists() {
            return Err(ScribeError::MediaNotFound(media_path.to_path_buf()));
        }

        let filename = media_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        info!("🎤 Uploading for transcription: {}", media_path.display());

        let file_bytes = tokio::fs::read(media_path).await?;
        let form = Self::options_form(options).part(
            "file",
            reqwest::multipart::Part::bytes(file_bytes).file_name(filename),
        );

        self.submit(form).await
    }

    /// Request transcription of a file already hosted in cloud storage
    pub async fn transcribe_url(
        &self,
        cloud_storage_url: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        info!("🎤 Requesting transcription of remote file: {}", cloud_storage_url);

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in Self::url_request_fields(cloud_storage_url, options) {
            form = form.text(name, value);
        }

        self.submit(form).await
    }

    fn options_form(options: &TranscriptionOptions) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in options.to_form_fields() {
            form = form.text(name, value);
        }
        form
    }

    /// Form fields for a cloud-storage request: the option fields plus the
    /// storage URL itself
    fn url_request_fields(
        cloud_storage_url: &str,
        options: &TranscriptionOptions,
    ) -> Vec<(&'static str, String)> {
        let mut fields = options.to_form_fields();
        fields.push(("cloud_storage_url", cloud_storage_url.to_string()));
        fields
    }

    async fn submit(&self, form: reqwest::multipart::Form) -> Result<TranscriptionResult> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScribeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: TranscriptionResult = response.json().await?;
        debug!(
            "Received transcription: {} chars, {} words",
            result.text.len(),
            result.words.len()
        );
        Ok(result)
    }
}

#[async_trait]
impl Transcribe for TranscriptionClient {
    async fn transcribe_file(
        &self,
        media_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        TranscriptionClient::transcribe_file(self, media_path, options).await
    }
}
