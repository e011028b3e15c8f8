use super::timecode;
use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: Plain-text rendering (generate-only, lossy by design)

/// Generate plain text, one cue per line with a readable timestamp prefix
pub fn generate(segments: &[Segment], _meta: &TrackMeta) -> String {
    segments
        .iter()
        .map(|segment| {
            format!(
                "[{}] {}",
                timecode::seconds_to_readable(segment.start_time),
                segment.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
