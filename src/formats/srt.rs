use once_cell::sync::Lazy;
use regex::Regex;

use super::timecode;
use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: SRT (SubRip) codec

static SRT_TIME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:[\d:,\.]+)\s+-->\s+(\d+:[\d:,\.]+)").unwrap()
});

/// Generate SRT content: 1-based index, `HH:MM:SS,mmm` timestamps,
/// blank-line separated blocks
pub fn generate(segments: &[Segment], _meta: &TrackMeta) -> String {
    let mut out = String::new();

    for (i, segment) in segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            timecode::seconds_to_srt(segment.start_time),
            timecode::seconds_to_srt(segment.end_time),
            segment.text
        ));
    }

    out
}

/// Parse SRT content into segments
///
/// Blocks with no recognizable timestamp line are skipped; zero well-formed
/// cues yields an empty vector, not an error.
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for block in content.trim().split("\n\n") {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 2 {
            continue;
        }

        // The index line is optional in the wild; find the timestamp line
        let time_idx = match lines.iter().position(|l| SRT_TIME_LINE.is_match(l)) {
            Some(idx) => idx,
            None => continue,
        };

        let caps = match SRT_TIME_LINE.captures(lines[time_idx]) {
            Some(caps) => caps,
            None => continue,
        };

        let start_time = timecode::parse_clock_time(&caps[1]);
        let end_time = timecode::parse_clock_time(&caps[2]);
        let (start_time, end_time) = match (start_time, end_time) {
            (Some(s), Some(e)) => (s, e),
            _ => continue,
        };

        let text = lines[time_idx + 1..].join("\n");
        if text.trim().is_empty() {
            continue;
        }

        segments.push(Segment::new(start_time, end_time, text));
    }

    segments
}
