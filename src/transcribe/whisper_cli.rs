use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use tokio::process::Command;

use super::{RawTranscriptSegment, Transcriber, TranscriptionOptions, TranscriptionOutcome};
use crate::errors::TranscriptionError;

// @module: whisper CLI transcription engine

const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(3600);

#[derive(Deserialize)]
struct WhisperJson {
    #[serde(default)]
    language: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
    // Log probability of the decoded tokens; mapped onto [0, 1]
    #[serde(default)]
    avg_logprob: f64,
}

impl WhisperSegment {
    fn confidence(&self) -> f64 {
        self.avg_logprob.exp().clamp(0.0, 1.0)
    }
}

/// Transcriber shelling out to the `whisper` CLI with JSON output
pub struct WhisperCliTranscriber {
    binary: String,
}

impl WhisperCliTranscriber {
    pub fn new() -> Self {
        Self {
            binary: "whisper".to_string(),
        }
    }
}

impl Default for WhisperCliTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionOutcome, TranscriptionError> {
        if !audio_path.exists() {
            return Err(TranscriptionError::AudioNotFound(
                audio_path.display().to_string(),
            ));
        }

        let out_dir = tempfile::tempdir()
            .map_err(|e| TranscriptionError::EngineFailed(e.to_string()))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(audio_path)
            .args(["--model", &options.model])
            .args(["--output_format", "json"])
            .args(["--output_dir"])
            .arg(out_dir.path());
        if let Some(language) = &options.language {
            cmd.args(["--language", language]);
        }

        info!(
            "Transcribing {} with whisper model '{}'",
            audio_path.display(),
            options.model
        );
        let output = tokio::time::timeout(TRANSCRIBE_TIMEOUT, cmd.output())
            .await
            .map_err(|_| TranscriptionError::EngineFailed("transcription timed out".to_string()))?
            .map_err(|e| TranscriptionError::EngineFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::EngineFailed(stderr.trim().to_string()));
        }

        // whisper writes <audio stem>.json into the output directory
        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let json_path = out_dir.path().join(format!("{}.json", stem));
        debug!("Reading transcript from {}", json_path.display());

        let content = std::fs::read_to_string(&json_path)
            .map_err(|e| TranscriptionError::EngineFailed(e.to_string()))?;
        let parsed: WhisperJson = serde_json::from_str(&content)
            .map_err(|e| TranscriptionError::EngineFailed(format!("bad transcript JSON: {}", e)))?;

        let segments = parsed
            .segments
            .iter()
            .map(|s| RawTranscriptSegment {
                start_time: s.start,
                end_time: s.end,
                text: s.text.clone(),
                confidence: s.confidence(),
            })
            .collect();

        Ok(TranscriptionOutcome {
            segments,
            language: if parsed.language.is_empty() {
                None
            } else {
                Some(parsed.language)
            },
            model: options.model.clone(),
        })
    }
}
