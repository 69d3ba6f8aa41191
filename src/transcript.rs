//! Data model for speech-to-text API responses

use serde::{Deserialize, Serialize};

/// Complete transcription result as returned by the speech-to-text API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcription text
    #[serde(default)]
    pub text: String,
    /// Detected or requested language (ISO code)
    #[serde(default)]
    pub language_code: String,
    /// Language detection confidence (0.0 - 1.0)
    #[serde(default)]
    pub language_probability: f64,
    /// Individual words with timing and speaker metadata, ordered by time
    #[serde(default)]
    pub words: Vec<Word>,
    /// Extra server-rendered export formats, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_formats: Option<Vec<AdditionalFormat>>,
}

/// One token of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Distinguishes spoken words from vocalized audio cues like laughter
    #[serde(rename = "type", default)]
    pub word_type: WordType,
    /// Start time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Which speaker uttered this word (diarization)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordType {
    #[default]
    Word,
    AudioEvent,
}

/// Server-rendered export format entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalFormat {
    #[serde(default)]
    pub requested_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub content: String,
}

impl Word {
    /// Plain spoken word with timing, no speaker label
    pub fn spoken(text: &str, start: f64, end: f64) -> Self {
        Self {
            text: text.to_string(),
            word_type: WordType::Word,
            start: Some(start),
            end: Some(end),
            speaker_id: None,
        }
    }

    /// Spoken word attributed to a speaker
    pub fn with_speaker(text: &str, start: f64, end: f64, speaker: &str) -> Self {
        Self {
            speaker_id: Some(speaker.to_string()),
            ..Self::spoken(text, start, end)
        }
    }

    pub fn is_audio_event(&self) -> bool {
        self.word_type == WordType::AudioEvent
    }
}

impl TranscriptionResult {
    /// Whether any word carries a speaker label
    pub fn has_speakers(&self) -> bool {
        self.words.iter().any(|w| w.speaker_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_type_serde_tag() {
        let json = r#"{"text":"(laughter)","type":"audio_event","start":1.0,"end":1.5}"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert!(word.is_audio_event());
        assert_eq!(word.speaker_id, None);

        let back = serde_json::to_value(&word).unwrap();
        assert_eq!(back["type"], "audio_event");
    }

    #[test]
    fn test_result_defaults_for_missing_fields() {
        let result: TranscriptionResult = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(result.text, "hi");
        assert!(result.words.is_empty());
        assert!(result.additional_formats.is_none());
        assert!(!result.has_speakers());
    }

    #[test]
    fn test_has_speakers() {
        let mut result = TranscriptionResult {
            text: "hello".to_string(),
            language_code: "en".to_string(),
            language_probability: 0.99,
            words: vec![Word::spoken("hello", 0.0, 0.4)],
            additional_formats: None,
        };
        assert!(!result.has_speakers());

        result.words.push(Word::with_speaker("there", 0.4, 0.8, "speaker_1"));
        assert!(result.has_speakers());
    }
}
