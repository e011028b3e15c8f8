/*!
 * AI transcription support.
 *
 * Defines the engine-agnostic transcriber trait, the raw transcript data
 * that engines produce, and the conversion of a finished transcription
 * into a subtitle track. Actual speech-to-text engines plug in behind the
 * [`Transcriber`] trait.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::errors::TranscriptionError;
use crate::subtitle_model::{make_track, Track, TrackQuality};

pub mod post_process;
pub mod whisper_cli;

pub use post_process::{detect_language_from_segments, post_process, PostProcessOptions};

/// Whisper model catalog: name and a short description shown to users
pub const WHISPER_MODELS: [(&str, &str); 7] = [
    ("tiny", "Fastest, lowest accuracy (~39M parameters)"),
    ("base", "Good balance of speed and accuracy (~74M parameters)"),
    ("small", "Better accuracy, slower (~244M parameters)"),
    ("medium", "High accuracy, much slower (~769M parameters)"),
    ("large", "Best accuracy, slowest (~1550M parameters)"),
    ("large-v2", "Improved large checkpoint"),
    ("large-v3", "Latest large checkpoint"),
];

/// Whether a model name appears in the catalog
pub fn is_known_model(name: &str) -> bool {
    WHISPER_MODELS.iter().any(|(model, _)| *model == name)
}

/// Which AI capabilities are enabled for a run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AiCapabilities {
    /// Whisper-style local transcription
    #[serde(default)]
    pub whisper: bool,

    /// Online speech recognition fallback
    #[serde(default)]
    pub speech_recognition: bool,

    /// Machine translation of finished tracks
    #[serde(default)]
    pub translate: bool,
}

impl AiCapabilities {
    /// Whether any transcription engine is enabled
    pub fn can_transcribe(&self) -> bool {
        self.whisper || self.speech_recognition
    }
}

/// Options handed to a transcription engine
#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    /// Model name, e.g. "base"
    pub model: String,

    /// Language hint; engines auto-detect when absent
    pub language: Option<String>,
}

/// One segment as produced by an engine, before post-processing
#[derive(Debug, Clone)]
pub struct RawTranscriptSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub confidence: f64,
}

/// Everything an engine reports back for one audio file
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub segments: Vec<RawTranscriptSegment>,
    /// Language the engine detected, if it reports one
    pub language: Option<String>,
    /// Model that produced the transcript
    pub model: String,
}

/// A finished transcription with run statistics attached
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub outcome: TranscriptionOutcome,
    pub model_used: String,
    /// Wall-clock seconds spent in the engine
    pub processing_time: f64,
    pub word_count: usize,
}

impl TranscriptionResult {
    pub fn new(outcome: TranscriptionOutcome, processing_time: f64) -> Self {
        let word_count = outcome
            .segments
            .iter()
            .map(|s| s.text.split_whitespace().count())
            .sum();
        let model_used = outcome.model.clone();
        Self {
            outcome,
            model_used,
            processing_time,
            word_count,
        }
    }
}

/// A speech-to-text engine
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Engine name used in logs and provenance strings
    fn name(&self) -> &str;

    /// Transcribe the audio file at `audio_path`
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionOutcome, TranscriptionError>;
}

// One async lock per model name. Loading the same model twice concurrently
// wastes memory and can crash smaller machines, so transcriptions with the
// same model serialize on this lock.
static MODEL_LOCKS: Lazy<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The shared lock guarding concurrent use of one model
pub fn model_lock(model: &str) -> Arc<tokio::sync::Mutex<()>> {
    let mut locks = MODEL_LOCKS.lock();
    locks
        .entry(model.to_string())
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

/// Turn a finished transcription into a subtitle track.
///
/// Segments are post-processed, the language falls back to Unicode-range
/// detection when the engine did not report one, and provenance is recorded
/// as `ai_<model>`.
pub fn track_from_transcription(
    outcome: TranscriptionOutcome,
    options: &PostProcessOptions,
) -> Result<Track, TranscriptionError> {
    let model = outcome.model.clone();
    let segments = post_process(outcome.segments, options);
    if segments.is_empty() {
        return Err(TranscriptionError::EngineFailed(format!(
            "model {} produced no usable segments",
            model
        )));
    }

    let language = outcome
        .language
        .unwrap_or_else(|| detect_language_from_segments(&segments));

    Ok(make_track(
        &language,
        true,
        "transcription",
        None,
        segments,
        TrackQuality::Medium,
        &format!("ai_{}", model),
    ))
}
