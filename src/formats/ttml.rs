use once_cell::sync::Lazy;
use regex::Regex;

use super::timecode;
use super::xml;
use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: TTML codec (also serves DFXP, which is the same document model)

static P_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<p\b([^>]*)>(.*?)</p>"#).unwrap()
});

static BEGIN_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"begin="([^"]*)""#).unwrap());
static END_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"end="([^"]*)""#).unwrap());
static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").unwrap());
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Generate a namespaced TTML document with a default style and one
/// `<p>` element per segment
pub fn generate(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec![
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string(),
        format!(
            "<tt xmlns=\"http://www.w3.org/ns/ttml\" xmlns:tts=\"http://www.w3.org/ns/ttml#styling\" xml:lang=\"{}\">",
            xml::escape(&meta.language)
        ),
        "  <head>".to_string(),
        "    <styling>".to_string(),
        "      <style xml:id=\"defaultStyle\" tts:fontFamily=\"Arial\" tts:fontSize=\"16px\" tts:color=\"white\"/>".to_string(),
        "    </styling>".to_string(),
        "  </head>".to_string(),
        "  <body>".to_string(),
        "    <div>".to_string(),
    ];

    for segment in segments {
        let text = xml::escape(&segment.text).replace('\n', "<br/>");
        lines.push(format!(
            "      <p begin=\"{}\" end=\"{}\" style=\"defaultStyle\">{}</p>",
            timecode::seconds_to_ttml(segment.start_time),
            timecode::seconds_to_ttml(segment.end_time),
            text
        ));
    }

    lines.push("    </div>".to_string());
    lines.push("  </body>".to_string());
    lines.push("</tt>".to_string());
    lines.join("\n")
}

/// Parse a TTML or DFXP document back into segments
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for caps in P_ELEMENT.captures_iter(content) {
        let attrs = &caps[1];
        let begin = BEGIN_ATTR
            .captures(attrs)
            .and_then(|c| timecode::parse_ttml_time(&c[1]));
        let end = END_ATTR
            .captures(attrs)
            .and_then(|c| timecode::parse_ttml_time(&c[1]));
        let (start, end) = match (begin, end) {
            (Some(s), Some(e)) => (s, e),
            _ => continue,
        };

        let with_breaks = BREAK_TAG.replace_all(&caps[2], "\n");
        let stripped = INLINE_TAG.replace_all(&with_breaks, "");
        let text = xml::unescape(stripped.trim());
        if text.is_empty() {
            continue;
        }

        segments.push(Segment::new(start, end, text));
    }

    segments
}
