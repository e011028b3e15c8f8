use once_cell::sync::Lazy;
use regex::Regex;

use super::timecode;
use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: WebVTT codec

static VTT_TIME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:[\d:\.,]+)\s+-->\s+(\d+:[\d:\.,]+)").unwrap()
});

static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Generate WebVTT content with the literal `WEBVTT` header and an
/// optional `Language:` metadata line
pub fn generate(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec!["WEBVTT".to_string()];

    if !meta.language.is_empty() {
        lines.push(format!("Language: {}", meta.language));
    }

    lines.push(String::new());

    for segment in segments {
        lines.push(format!(
            "{} --> {}",
            timecode::seconds_to_vtt(segment.start_time),
            timecode::seconds_to_vtt(segment.end_time)
        ));
        lines.push(segment.text.clone());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Parse WebVTT content into segments, stripping inline markup tags
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let lines: Vec<&str> = content.lines().collect();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if line.contains("-->") {
            if let Some(caps) = VTT_TIME_LINE.captures(line) {
                let start_time = timecode::parse_clock_time(&caps[1]);
                let end_time = timecode::parse_clock_time(&caps[2]);

                // Collect the cue text up to the next blank line
                i += 1;
                let mut text_lines = Vec::new();
                while i < lines.len() && !lines[i].trim().is_empty() {
                    let stripped = INLINE_TAG.replace_all(lines[i].trim(), "").to_string();
                    if !stripped.is_empty() {
                        text_lines.push(stripped);
                    }
                    i += 1;
                }

                if let (Some(start), Some(end)) = (start_time, end_time) {
                    if !text_lines.is_empty() {
                        segments.push(Segment::new(start, end, text_lines.join("\n")));
                    }
                }
            }
        }
        i += 1;
    }

    segments
}
