use once_cell::sync::Lazy;
use regex::Regex;

use super::timecode;
use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: ASS/SSA (SubStation Alpha) codec

// Override tags like {\pos(10,10)}. Stripping is blunt and can also remove
// drawing commands inside braces; accepted lossy behavior.
static OVERRIDE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

const ASS_STYLES_HEADER: &str = "[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,16,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,0,2,10,10,10,1";

const SSA_STYLES_HEADER: &str = "[V4 Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, TertiaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, AlphaLevel, Encoding
Style: Default,Arial,16,16777215,255,0,0,0,0,1,2,0,2,10,10,10,0,1";

/// Generate ASS content with the full style-sheet header players expect
pub fn generate_ass(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec![
        "[Script Info]".to_string(),
        format!("Title: {} Subtitles", meta.language_name),
        "ScriptType: v4.00+".to_string(),
        String::new(),
        ASS_STYLES_HEADER.to_string(),
        String::new(),
        "[Events]".to_string(),
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
            .to_string(),
    ];

    for segment in segments {
        let text = segment.text.replace('\n', "\\N");
        lines.push(format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            timecode::seconds_to_ass(segment.start_time),
            timecode::seconds_to_ass(segment.end_time),
            text
        ));
    }

    lines.join("\n")
}

/// Generate SSA content (v4.00 header, `Marked=` dialogue prefix, `\n` breaks)
pub fn generate_ssa(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec![
        "[Script Info]".to_string(),
        format!("Title: {} Subtitles", meta.language_name),
        "ScriptType: v4.00".to_string(),
        String::new(),
        SSA_STYLES_HEADER.to_string(),
        String::new(),
        "[Events]".to_string(),
        "Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
            .to_string(),
    ];

    for segment in segments {
        let text = segment.text.replace('\n', "\\n");
        lines.push(format!(
            "Dialogue: Marked=0,{},{},Default,,0,0,0,,{}",
            timecode::seconds_to_ass(segment.start_time),
            timecode::seconds_to_ass(segment.end_time),
            text
        ));
    }

    lines.join("\n")
}

/// Parse ASS or SSA content; SSA dialogue lines follow the same layout,
/// so both formats share this algorithm
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut in_events = false;

    for line in content.lines() {
        let line = line.trim();

        if line.starts_with("[Events]") {
            in_events = true;
            continue;
        } else if line.starts_with('[') && in_events {
            break;
        }

        if in_events && line.starts_with("Dialogue:") {
            // Dialogue: layer/marked, start, end, style, name, 4 margins/effect, text
            let parts: Vec<&str> = line.splitn(10, ',').collect();
            if parts.len() < 10 {
                continue;
            }

            let start_time = timecode::parse_ass_time(parts[1]);
            let end_time = timecode::parse_ass_time(parts[2]);
            let (start, end) = match (start_time, end_time) {
                (Some(s), Some(e)) => (s, e),
                _ => continue,
            };

            let text = OVERRIDE_TAG
                .replace_all(parts[9], "")
                .replace("\\N", "\n")
                .replace("\\n", "\n");

            if !text.trim().is_empty() {
                segments.push(Segment::new(start, end, text.trim().to_string()));
            }
        }
    }

    segments
}
