use once_cell::sync::Lazy;
use regex::Regex;

use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: Generic XML codec

static SUBTITLE_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<subtitle\b([^>]*)>(.*?)</subtitle>"#).unwrap()
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_][\w-]*)="([^"]*)""#).unwrap()
});

/// Escape the five XML-reserved characters
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Reverse [`escape`]; `&amp;` must come last so it cannot re-trigger
/// the other replacements
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Generate the generic `<subtitles>` document with a metadata child and
/// one `<subtitle>` element per segment
pub fn generate(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec![
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string(),
        "<subtitles>".to_string(),
        "  <metadata>".to_string(),
        format!("    <language>{}</language>", escape(&meta.language)),
        format!(
            "    <language_name>{}</language_name>",
            escape(&meta.language_name)
        ),
        format!("    <total_segments>{}</total_segments>", segments.len()),
        format!(
            "    <is_auto_generated>{}</is_auto_generated>",
            meta.is_auto_generated
        ),
        "  </metadata>".to_string(),
    ];

    for (i, segment) in segments.iter().enumerate() {
        let language = segment
            .language
            .clone()
            .unwrap_or_else(|| meta.language.clone());
        lines.push(format!(
            "  <subtitle index=\"{}\" start=\"{}\" end=\"{}\" confidence=\"{}\" language=\"{}\">{}</subtitle>",
            i + 1,
            segment.start_time,
            segment.end_time,
            segment.confidence,
            escape(&language),
            escape(&segment.text)
        ));
    }

    lines.push("</subtitles>".to_string());
    lines.join("\n")
}

/// Parse the generic XML document back into segments
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for caps in SUBTITLE_ELEMENT.captures_iter(content) {
        let mut start_time = None;
        let mut end_time = None;
        let mut confidence = 1.0;
        let mut language = None;

        for attr in ATTRIBUTE.captures_iter(&caps[1]) {
            let value = &attr[2];
            match &attr[1] {
                "start" => start_time = value.parse().ok(),
                "end" => end_time = value.parse().ok(),
                "confidence" => confidence = value.parse().unwrap_or(1.0),
                "language" if !value.is_empty() => {
                    language = Some(unescape(value));
                }
                _ => {}
            }
        }

        let (start, end) = match (start_time, end_time) {
            (Some(s), Some(e)) => (s, e),
            _ => continue,
        };

        let text = unescape(caps[2].trim());
        if text.is_empty() {
            continue;
        }

        segments.push(Segment::with_details(start, end, text, confidence, language));
    }

    segments
}
