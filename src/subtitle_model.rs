use std::fmt;
use serde::{Deserialize, Serialize};

use crate::language_utils;

// @module: Canonical subtitle data model

// @struct: Single timed text unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Start time in seconds
    pub start_time: f64,

    // @field: End time in seconds
    pub end_time: f64,

    // @field: Subtitle text, may be multi-line
    pub text: String,

    // @field: Confidence in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    // @field: Language tag, if known
    #[serde(default)]
    pub language: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

impl Segment {
    /// Creates a segment with default confidence and no language tag
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Segment {
            start_time,
            end_time,
            text: text.into(),
            confidence: 1.0,
            language: None,
        }
    }

    /// Creates a segment carrying confidence and language
    pub fn with_details(
        start_time: f64,
        end_time: f64,
        text: impl Into<String>,
        confidence: f64,
        language: Option<String>,
    ) -> Self {
        Segment {
            start_time,
            end_time,
            text: text.into(),
            confidence,
            language,
        }
    }

    /// Duration of the segment in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Quality tag attached to a track by its producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackQuality {
    High,
    Medium,
    Low,
    Unknown,
}

impl fmt::Display for TrackQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackQuality::High => "high",
            TrackQuality::Medium => "medium",
            TrackQuality::Low => "low",
            TrackQuality::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Ordered collection of segments for one language/source, plus provenance
///
/// A Track is the unit of conversion and of file output. Transformations
/// (translation, post-processing) produce new Tracks rather than mutating
/// one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Language tag
    pub language: String,

    /// Display name for the language
    pub language_name: String,

    /// Whether the track was machine-generated by the platform
    pub is_auto_generated: bool,

    /// Format the segments were originally parsed from
    pub source_format: String,

    /// Download URL the raw blob came from, if any
    pub source_url: Option<String>,

    /// Segments ordered by start time
    pub segments: Vec<Segment>,

    /// Quality tag
    pub quality: TrackQuality,

    /// Provenance string, e.g. "youtube_manual", "ai_whisper-base"
    pub source: String,
}

impl Track {
    /// Total duration covered by the track, first start to last end
    pub fn total_duration(&self) -> f64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => last.end_time - first.start_time,
            _ => 0.0,
        }
    }
}

/// Read-only descriptor for a video, produced once per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub duration: f64,
    pub uploader: String,
    pub upload_date: String,
    pub view_count: u64,
    pub description: String,
    pub thumbnail: String,
    pub webpage_url: String,
    pub platform: String,
    /// Languages with manually authored subtitles
    pub available_subtitle_languages: Vec<String>,
    /// Languages with automatically generated captions
    pub automatic_caption_languages: Vec<String>,
}

impl VideoInfo {
    /// Whether the platform reports any subtitles at all
    pub fn has_subtitles(&self) -> bool {
        !self.available_subtitle_languages.is_empty()
            || !self.automatic_caption_languages.is_empty()
    }
}

/// Validate a sequence of segments, returning human-readable issue reports
///
/// Checks: start < end per segment, no temporal overlap between consecutive
/// segments, non-empty trimmed text, confidence within [0, 1]. Validation
/// never fails; callers decide whether to reject or warn.
pub fn validate_segments(segments: &[Segment]) -> Vec<String> {
    let mut issues = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.start_time >= segment.end_time {
            issues.push(format!("Segment {}: start time >= end time", i + 1));
        }

        if i > 0 && segment.start_time < segments[i - 1].end_time {
            issues.push(format!("Segment {}: overlaps with previous segment", i + 1));
        }

        if segment.text.trim().is_empty() {
            issues.push(format!("Segment {}: empty text", i + 1));
        }

        if segment.confidence < 0.0 || segment.confidence > 1.0 {
            issues.push(format!("Segment {}: invalid confidence value", i + 1));
        }
    }

    issues
}

/// Build a track, filling the display name from the language tag
pub fn make_track(
    language: &str,
    is_auto_generated: bool,
    source_format: &str,
    source_url: Option<String>,
    segments: Vec<Segment>,
    quality: TrackQuality,
    source: &str,
) -> Track {
    Track {
        language: language.to_string(),
        language_name: language_utils::display_name_or_tag(language),
        is_auto_generated,
        source_format: source_format.to_string(),
        source_url,
        segments,
        quality,
        source: source.to_string(),
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} segments from {}",
            self.language,
            self.language_name,
            self.segments.len(),
            self.source
        )
    }
}
