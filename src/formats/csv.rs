use super::TrackMeta;
use crate::subtitle_model::Segment;

// @module: CSV codec

// Embedded newlines are escaped with this token so they cannot break row
// structure. Text already containing the token will not survive a
// round-trip; accepted lossy behavior carried over from the original format.
const NEWLINE_TOKEN: &str = " | ";

/// Quote a field if it contains a comma, quote or newline
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one CSV record into fields, honoring double-quoted fields
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Generate CSV with a header row and one row per segment
pub fn generate(segments: &[Segment], meta: &TrackMeta) -> String {
    let mut lines = vec!["Index,Start Time,End Time,Duration,Text,Confidence,Language".to_string()];

    for (i, segment) in segments.iter().enumerate() {
        let text = segment.text.replace('\n', NEWLINE_TOKEN);
        let language = segment
            .language
            .clone()
            .unwrap_or_else(|| meta.language.clone());

        lines.push(format!(
            "{},{},{},{},{},{},{}",
            i + 1,
            segment.start_time,
            segment.end_time,
            segment.duration(),
            quote_field(&text),
            segment.confidence,
            quote_field(&language)
        ));
    }

    lines.join("\n")
}

/// Parse CSV content into segments, reversing the newline escape
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for (i, line) in content.lines().enumerate() {
        // Skip the header row
        if i == 0 || line.trim().is_empty() {
            continue;
        }

        let fields = split_record(line);
        if fields.len() < 5 {
            continue;
        }

        let start_time: f64 = match fields[1].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let end_time: f64 = match fields[2].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };

        let text = fields[4].replace(NEWLINE_TOKEN, "\n");
        let confidence: f64 = fields
            .get(5)
            .and_then(|f| f.parse().ok())
            .unwrap_or(1.0);
        let language = fields
            .get(6)
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string());

        segments.push(Segment::with_details(
            start_time, end_time, text, confidence, language,
        ));
    }

    segments
}
