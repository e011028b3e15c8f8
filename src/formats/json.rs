use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: JSON codec with metadata envelope

#[derive(Serialize, Deserialize)]
struct JsonCue {
    index: usize,
    start_time: f64,
    end_time: f64,
    duration: f64,
    text: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    language: String,
}

fn default_confidence() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct JsonEnvelope {
    #[serde(default)]
    subtitles: Vec<JsonCue>,
}

/// Generate the JSON envelope: a metadata object plus a `subtitles` array
pub fn generate(segments: &[Segment], meta: &TrackMeta) -> Result<String> {
    let cues: Vec<JsonCue> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| JsonCue {
            index: i + 1,
            start_time: segment.start_time,
            end_time: segment.end_time,
            duration: segment.duration(),
            text: segment.text.clone(),
            confidence: segment.confidence,
            language: segment
                .language
                .clone()
                .unwrap_or_else(|| meta.language.clone()),
        })
        .collect();

    let envelope = json!({
        "metadata": {
            "language": meta.language,
            "language_name": meta.language_name,
            "format": "json",
            "total_segments": segments.len(),
            "is_auto_generated": meta.is_auto_generated,
            "source": meta.source,
            "generated_at": Local::now().to_rfc3339(),
        },
        "subtitles": cues,
    });

    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse the JSON envelope back into segments
///
/// Start/end/text/confidence/language round-trip exactly; a document with
/// no `subtitles` array yields an empty vector.
pub fn parse(content: &str) -> Vec<Segment> {
    let envelope: JsonEnvelope = match serde_json::from_str(content) {
        Ok(envelope) => envelope,
        Err(_) => return Vec::new(),
    };

    envelope
        .subtitles
        .into_iter()
        .map(|cue| {
            let language = if cue.language.is_empty() {
                None
            } else {
                Some(cue.language)
            };
            Segment::with_details(cue.start_time, cue.end_time, cue.text, cue.confidence, language)
        })
        .collect()
}
