//! Configuration for the transcription archiver

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ScribeError};
use crate::format::OutputFormat;

/// Known transcription model identifiers
pub const AVAILABLE_MODELS: &[&str] = &["scribe_v1", "scribe_v1_experimental"];

/// Configuration for the transcription archiver
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Speech-to-text API connection settings
    pub api: ApiConfig,

    /// Transcription request options
    pub transcription: TranscriptionOptions,

    /// Directory sync settings
    pub sync: SyncConfig,
}

/// Connection settings for the speech-to-text service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Service credential, sent as the xi-api-key header
    pub api_key: Option<String>,

    /// Endpoint URL for the speech-to-text conversion call
    pub endpoint: String,
}

/// Request options for the speech-to-text API.
///
/// Optional fields left as `None` are omitted from the outgoing request
/// entirely; the API rejects null-valued fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionOptions {
    /// Transcription model to use
    pub model_id: String,

    /// ISO language code hint; auto-detect when absent
    pub language_code: Option<String>,

    /// Tag non-speech sounds like (laughter) as audio_event words
    pub tag_audio_events: bool,

    /// Maximum number of speakers (1-32); auto-detect when absent
    pub num_speakers: Option<u8>,

    /// Timestamp resolution for the word list
    pub timestamps_granularity: TimestampsGranularity,

    /// Assign a speaker_id to each word
    pub diarize: bool,

    /// Input encoding hint for the service
    pub file_format: FileFormat,

    /// Decoding randomness (0.0-2.0); model default when absent
    pub temperature: Option<f32>,

    /// Extra server-rendered export formats to request
    pub additional_formats: Option<Vec<ExportFormatRequest>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampsGranularity {
    None,
    #[default]
    Word,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    PcmS16le16,
    #[default]
    Other,
}

/// One requested server-side export format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFormatRequest {
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_speakers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_timestamps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_characters_per_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_on_silence_longer_than_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_segment_duration_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_segment_chars: Option<u32>,
}

/// Directory layout and output format for batch sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory holding the media library
    pub media_dir: PathBuf,

    /// Directory holding the transcript archive
    pub transcripts_dir: PathBuf,

    /// Output format for new transcripts
    pub output_format: OutputFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.elevenlabs.io/v1/speech-to-text".to_string(),
        }
    }
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            model_id: "scribe_v1".to_string(),
            language_code: None,
            tag_audio_events: true,
            num_speakers: None,
            timestamps_granularity: TimestampsGranularity::Word,
            diarize: true,
            file_format: FileFormat::Other,
            temperature: None,
            additional_formats: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("files"),
            transcripts_dir: PathBuf::from("transcripts"),
            output_format: OutputFormat::Json,
        }
    }
}

impl TimestampsGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampsGranularity::None => "none",
            TimestampsGranularity::Word => "word",
            TimestampsGranularity::Character => "character",
        }
    }
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::PcmS16le16 => "pcm_s16le_16",
            FileFormat::Other => "other",
        }
    }
}

impl TranscriptionOptions {
    /// Render the options as multipart form fields.
    ///
    /// Only fields with a value are emitted; unset options never reach the
    /// wire. This is part of the API contract, not an optimization.
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("model_id", self.model_id.clone()),
            ("tag_audio_events", self.tag_audio_events.to_string()),
            (
                "timestamps_granularity",
                self.timestamps_granularity.as_str().to_string(),
            ),
            ("diarize", self.diarize.to_string()),
            ("file_format", self.file_format.as_str().to_string()),
        ];

        if let Some(ref language) = self.language_code {
            fields.push(("language_code", language.clone()));
        }
        if let Some(speakers) = self.num_speakers {
            fields.push(("num_speakers", speakers.to_string()));
        }
        if let Some(temperature) = self.temperature {
            fields.push(("temperature", temperature.to_string()));
        }
        if let Some(ref formats) = self.additional_formats {
            // The API takes this one field as a JSON-encoded array
            if let Ok(encoded) = serde_json::to_string(formats) {
                fields.push(("additional_formats", encoded));
            }
        }

        fields
    }
}

impl Config {
    /// Load configuration from file, falling back to environment variables
    pub fn load() -> Result<Self> {
        let config_paths = [
            "scribe-sync.toml",
            "config/scribe-sync.toml",
            "~/.config/scribe-sync/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_overrides();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Build configuration from environment variables on top of defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("ELEVENLABS_API_KEY") {
            if !api_key.is_empty() {
                self.api.api_key = Some(api_key);
            }
        }

        if let Ok(endpoint) = std::env::var("SCRIBE_SYNC_ENDPOINT") {
            self.api.endpoint = endpoint;
        }

        if let Ok(media_dir) = std::env::var("SCRIBE_SYNC_MEDIA_DIR") {
            self.sync.media_dir = PathBuf::from(media_dir);
        }

        if let Ok(transcripts_dir) = std::env::var("SCRIBE_SYNC_TRANSCRIPTS_DIR") {
            self.sync.transcripts_dir = PathBuf::from(transcripts_dir);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| ScribeError::Configuration(e.to_string()))?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !AVAILABLE_MODELS.contains(&self.transcription.model_id.as_str()) {
            return Err(ScribeError::Configuration(format!(
                "unknown model_id '{}', expected one of: {}",
                self.transcription.model_id,
                AVAILABLE_MODELS.join(", ")
            )));
        }

        if let Some(speakers) = self.transcription.num_speakers {
            if !(1..=32).contains(&speakers) {
                return Err(ScribeError::Configuration(format!(
                    "num_speakers must be between 1 and 32, got {}",
                    speakers
                )));
            }
        }

        if let Some(temperature) = self.transcription.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ScribeError::Configuration(format!(
                    "temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.api.api_key = Some(api_key);
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.config.api.endpoint = endpoint;
        self
    }

    pub fn with_language(mut self, language: String) -> Self {
        self.config.transcription.language_code = Some(language);
        self
    }

    pub fn with_diarize(mut self, diarize: bool) -> Self {
        self.config.transcription.diarize = diarize;
        self
    }

    pub fn with_media_dir(mut self, dir: PathBuf) -> Self {
        self.config.sync.media_dir = dir;
        self
    }

    pub fn with_transcripts_dir(mut self, dir: PathBuf) -> Self {
        self.config.sync.transcripts_dir = dir;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.sync.output_format = format;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transcription.model_id, "scribe_v1");
        assert!(config.transcription.diarize);
        assert_eq!(config.sync.media_dir, PathBuf::from("files"));
        assert_eq!(config.sync.output_format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_api_key("key-123".to_string())
            .with_language("en".to_string())
            .with_diarize(false)
            .with_output_format(OutputFormat::Srt)
            .build();

        assert_eq!(config.api.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.transcription.language_code.as_deref(), Some("en"));
        assert!(!config.transcription.diarize);
        assert_eq!(config.sync.output_format, OutputFormat::Srt);
    }

    #[test]
    fn test_unset_options_are_stripped_from_form() {
        let options = TranscriptionOptions::default();
        let fields = options.to_form_fields();

        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert!(names.contains(&"model_id"));
        assert!(names.contains(&"diarize"));
        assert!(!names.contains(&"language_code"));
        assert!(!names.contains(&"num_speakers"));
        assert!(!names.contains(&"temperature"));
        assert!(!names.contains(&"additional_formats"));
    }

    #[test]
    fn test_set_options_appear_in_form() {
        let options = TranscriptionOptions {
            language_code: Some("fr".to_string()),
            num_speakers: Some(2),
            temperature: Some(0.5),
            ..TranscriptionOptions::default()
        };
        let fields = options.to_form_fields();

        let get = |name: &str| {
            fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(get("language_code"), Some("fr"));
        assert_eq!(get("num_speakers"), Some("2"));
        assert_eq!(get("temperature"), Some("0.5"));
        assert_eq!(get("timestamps_granularity"), Some("word"));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.transcription.num_speakers = Some(40);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcription.temperature = Some(2.5);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcription.model_id = "whisper-large".to_string();
        assert!(config.validate().is_err());
    }
}
