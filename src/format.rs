//! Transcript output formats: JSON, plain text, and SRT subtitles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::{Result, ScribeError};
use crate::transcript::{TranscriptionResult, Word};

/// Maximum silence between a word and the running subtitle before a new
/// subtitle entry is started (seconds).
const SUBTITLE_GAP_SECONDS: f64 = 1.0;

/// Supported on-disk transcript formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Txt,
    Srt,
}

impl OutputFormat {
    /// File extension for this format, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
            OutputFormat::Srt => "srt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Txt),
            "srt" => Ok(OutputFormat::Srt),
            other => Err(ScribeError::InvalidFormat(other.to_string())),
        }
    }
}

/// One SRT subtitle entry
#[derive(Debug, Clone)]
pub struct SrtEntry {
    /// Sequential number, starting at 1
    pub index: u32,
    /// Start time in seconds; None formats as 00:00:00,000
    pub start: Option<f64>,
    /// End time in seconds
    pub end: Option<f64>,
    /// Subtitle text
    pub text: String,
}

impl fmt::Display for SrtEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}\n",
            self.index,
            format_time(self.start),
            format_time(self.end),
            self.text.trim()
        )
    }
}

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm). Missing values render
/// as the zero timestamp.
pub fn format_time(seconds: Option<f64>) -> String {
    let seconds = seconds.unwrap_or(0.0).max(0.0);
    let total_millis = (seconds * 1000.0).round() as u64;

    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render a transcription result in the requested format
pub fn render(result: &TranscriptionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Txt => Ok(render_txt(result)),
        OutputFormat::Srt => Ok(render_srt(result)),
    }
}

/// Write a transcription result to disk, creating parent directories as
/// needed. Existing files are overwritten.
pub async fn write_transcript(
    result: &TranscriptionResult,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = render(result, format)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

fn render_txt(result: &TranscriptionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Language: {}\n", result.language_code));
    out.push_str(&format!("Confidence: {:.2}\n", result.language_probability));
    out.push_str(&format!("Transcription:\n{}\n", result.text));

    if result.has_speakers() {
        out.push_str("\nDetailed breakdown with speakers:\n");
        for (speaker, text) in speaker_segments(&result.words) {
            match speaker {
                Some(speaker) => {
                    out.push_str(&format!("\n[{}]: {}", speaker.to_uppercase(), text))
                }
                None => out.push_str(&text),
            }
        }
        out.push('\n');
    }

    out
}

/// Consecutive words grouped by speaker. A new group starts each time a word
/// carries a speaker label different from the current one; unlabeled words
/// stay with the running group and audio events are parenthesized.
fn speaker_segments(words: &[Word]) -> Vec<(Option<String>, String)> {
    let mut segments: Vec<(Option<String>, String)> = Vec::new();
    let mut current_speaker: Option<String> = None;

    for word in words {
        let rendered = if word.is_audio_event() {
            format!("({})", word.text)
        } else {
            word.text.clone()
        };

        let starts_group = match word.speaker_id {
            Some(ref speaker) => current_speaker.as_deref() != Some(speaker.as_str()),
            None => segments.is_empty(),
        };

        if starts_group {
            current_speaker = word.speaker_id.clone();
            segments.push((word.speaker_id.clone(), rendered));
        } else if let Some((_, text)) = segments.last_mut() {
            text.push(' ');
            text.push_str(&rendered);
        }
    }

    segments
}

/// Build SRT entries from the word sequence. A new entry starts whenever the
/// speaker changes or the silence before a word exceeds the gap threshold;
/// the final accumulated entry is always flushed.
pub fn build_srt_entries(result: &TranscriptionResult) -> Vec<SrtEntry> {
    let mut entries: Vec<SrtEntry> = Vec::new();
    let mut current: Option<SrtEntry> = None;
    let mut current_speaker: Option<String> = None;

    for word in &result.words {
        let starts_new = match current {
            None => true,
            Some(ref entry) => {
                let speaker_changed = word.speaker_id != current_speaker;
                let gap_exceeded = match (word.start, entry.end) {
                    (Some(word_start), Some(entry_end)) => {
                        word_start - entry_end > SUBTITLE_GAP_SECONDS
                    }
                    _ => false,
                };
                speaker_changed || gap_exceeded
            }
        };

        if starts_new {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current_speaker = word.speaker_id.clone();
            current = Some(SrtEntry {
                index: entries.len() as u32 + 1,
                start: word.start,
                end: word.end,
                text: word.text.clone(),
            });
        } else if let Some(ref mut entry) = current {
            entry.text.push(' ');
            entry.text.push_str(&word.text);
            if word.end.is_some() {
                entry.end = word.end;
            }
        }
    }

    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    entries
}

fn render_srt(result: &TranscriptionResult) -> String {
    let mut out = String::new();
    for entry in build_srt_entries(result) {
        out.push_str(&entry.to_string());
        out.push('\n');
    }
    out
}

/// Log a transcription result in a human-readable form
pub fn print_result(result: &TranscriptionResult) {
    info!(
        "📝 Language: {} (confidence: {:.2})",
        result.language_code, result.language_probability
    );

    let preview: String = result.text.chars().take(100).collect();
    if result.text.chars().count() > 100 {
        info!("🗣️  Text: {}...", preview);
    } else {
        info!("🗣️  Text: {}", preview);
    }

    if result.has_speakers() {
        info!("Detailed breakdown:");
        for (speaker, text) in speaker_segments(&result.words) {
            match speaker {
                Some(speaker) => info!("[{}]: {}", speaker.to_uppercase(), text),
                None => info!("{}", text),
            }
        }
    }

    if let Some(ref formats) = result.additional_formats {
        info!("Additional formats generated:");
        for format in formats {
            info!("  - {} format", format.requested_format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Word, WordType};

    fn result_with_words(words: Vec<Word>) -> TranscriptionResult {
        TranscriptionResult {
            text: words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            language_code: "en".to_string(),
            language_probability: 0.98,
            words,
            additional_formats: None,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Some(3661.234)), "01:01:01,234");
        assert_eq!(format_time(None), "00:00:00,000");
        assert_eq!(format_time(Some(0.0)), "00:00:00,000");
        assert_eq!(format_time(Some(1.5)), "00:00:01,500");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("srt".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("docx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Txt.extension(), "txt");
    }

    #[test]
    fn test_srt_splits_on_speaker_change_and_gap() {
        // "Bye" triggers a new entry through both the speaker change and the
        // >1s silence after "there"
        let result = result_with_words(vec![
            Word::with_speaker("Hi", 0.0, 0.5, "A"),
            Word::with_speaker("there", 0.5, 1.0, "A"),
            Word::with_speaker("Bye", 3.0, 3.5, "B"),
        ]);

        let entries = build_srt_entries(&result);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].text, "Hi there");
        assert_eq!(entries[1].index, 2);
        assert_eq!(entries[1].text, "Bye");

        let srt = render(&result, OutputFormat::Srt).unwrap();
        assert!(srt.contains("1\n00:00:00,000 --> 00:00:01,000\nHi there\n"));
        assert!(srt.contains("2\n00:00:03,000 --> 00:00:03,500\nBye\n"));
    }

    #[test]
    fn test_srt_gap_alone_splits_same_speaker() {
        let result = result_with_words(vec![
            Word::with_speaker("One", 0.0, 0.5, "A"),
            Word::with_speaker("two", 2.0, 2.5, "A"),
        ]);

        let entries = build_srt_entries(&result);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "One");
        assert_eq!(entries[1].text, "two");
    }

    #[test]
    fn test_srt_without_diarization_accumulates_one_entry() {
        let result = result_with_words(vec![
            Word::spoken("All", 0.0, 0.3),
            Word::spoken("together", 0.3, 0.9),
        ]);

        let entries = build_srt_entries(&result);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "All together");
        assert_eq!(entries[0].start, Some(0.0));
        assert_eq!(entries[0].end, Some(0.9));
    }

    #[test]
    fn test_srt_missing_times_format_as_zero() {
        let result = result_with_words(vec![Word {
            text: "untimed".to_string(),
            word_type: WordType::Word,
            start: None,
            end: None,
            speaker_id: None,
        }]);

        let srt = render(&result, OutputFormat::Srt).unwrap();
        assert!(srt.contains("00:00:00,000 --> 00:00:00,000"));
    }

    #[test]
    fn test_txt_header_and_speaker_breakdown() {
        let mut words = vec![
            Word::with_speaker("Hello", 0.0, 0.4, "speaker_1"),
            Word::with_speaker("world", 0.4, 0.8, "speaker_1"),
        ];
        words.push(Word {
            text: "laughter".to_string(),
            word_type: WordType::AudioEvent,
            start: Some(0.8),
            end: Some(1.2),
            speaker_id: Some("speaker_2".to_string()),
        });
        let result = result_with_words(words);

        let txt = render(&result, OutputFormat::Txt).unwrap();
        assert!(txt.starts_with("Language: en\nConfidence: 0.98\nTranscription:\n"));
        assert!(txt.contains("Detailed breakdown with speakers:"));
        assert!(txt.contains("[SPEAKER_1]: Hello world"));
        assert!(txt.contains("[SPEAKER_2]: (laughter)"));
    }

    #[test]
    fn test_speaker_segments_group_consecutive_words() {
        let words = vec![
            Word::with_speaker("Hello", 0.0, 0.4, "speaker_1"),
            Word::with_speaker("world", 0.4, 0.8, "speaker_1"),
            Word {
                text: "laughter".to_string(),
                word_type: WordType::AudioEvent,
                start: Some(0.8),
                end: Some(1.2),
                speaker_id: Some("speaker_2".to_string()),
            },
            // Unlabeled word stays with the running speaker group
            Word::spoken("then", 1.2, 1.5),
        ];

        let segments = speaker_segments(&words);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            (Some("speaker_1".to_string()), "Hello world".to_string())
        );
        assert_eq!(
            segments[1],
            (Some("speaker_2".to_string()), "(laughter) then".to_string())
        );
    }

    #[test]
    fn test_speaker_segments_without_labels_form_one_group() {
        let words = vec![Word::spoken("all", 0.0, 0.3), Word::spoken("plain", 0.3, 0.6)];
        let segments = speaker_segments(&words);
        assert_eq!(segments, vec![(None, "all plain".to_string())]);
    }

    #[test]
    fn test_txt_without_speakers_has_no_breakdown() {
        let result = result_with_words(vec![Word::spoken("plain", 0.0, 0.5)]);
        let txt = render(&result, OutputFormat::Txt).unwrap();
        assert!(!txt.contains("Detailed breakdown"));
    }

    #[test]
    fn test_json_round_trip() {
        let result = result_with_words(vec![
            Word::with_speaker("Hi", 0.0, 0.5, "A"),
            Word::spoken("there", 0.5, 1.0),
        ]);

        let json = render(&result, OutputFormat::Json).unwrap();
        let back: TranscriptionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[tokio::test]
    async fn test_write_transcript_creates_parent_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.json");

        let result = result_with_words(vec![Word::spoken("hi", 0.0, 0.2)]);
        write_transcript(&result, &path, OutputFormat::Json)
            .await
            .unwrap();

        assert!(path.exists());
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let back: TranscriptionResult = serde_json::from_str(&content).unwrap();
        assert_eq!(back, result);
    }
}
