use once_cell::sync::Lazy;
use regex::Regex;

use super::RawTranscriptSegment;
use crate::subtitle_model::Segment;

// @module: Transcript post-processing (cleanup, splitting, merging)

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Engine annotations like [music] or (applause)
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").unwrap());

/// Tuning knobs for the post-processing pass
#[derive(Debug, Clone)]
pub struct PostProcessOptions {
    /// Longest text, in characters, a single subtitle should carry
    pub max_subtitle_length: usize,

    /// Shortest duration, in seconds, a subtitle is allowed to keep
    pub min_subtitle_duration: f64,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            max_subtitle_length: 100,
            min_subtitle_duration: 0.5,
        }
    }
}

/// Clean one piece of transcript text: drop engine annotations, collapse
/// whitespace runs, and capitalize the first letter
pub fn clean_transcript_text(text: &str) -> String {
    let without_annotations = ANNOTATION.replace_all(text, " ");
    let collapsed = WHITESPACE_RUN
        .replace_all(without_annotations.trim(), " ")
        .to_string();

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => collapsed,
    }
}

/// Split overlong text into one piece per sentence.
///
/// A sentence that is itself too long gets bisected on word boundaries
/// until every piece fits; text without any sentence terminator is
/// bisected as a whole.
fn split_text(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    // Split into sentences, keeping the terminator with its sentence
    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }

    sentences
        .into_iter()
        .flat_map(|sentence| bisect_words(&sentence, max_len))
        .collect()
}

fn bisect_words(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 1 {
        // A single word longer than the limit stays intact
        return vec![text.to_string()];
    }

    let mid = words.len() / 2;
    let left = words[..mid].join(" ");
    let right = words[mid..].join(" ");

    let mut parts = bisect_words(&left, max_len);
    parts.extend(bisect_words(&right, max_len));
    parts
}

/// Clean, split, merge raw transcript segments into subtitle segments.
///
/// Pass one: overlong segments (over the character limit and more than ten
/// words) are split with the time span shared equally among the pieces;
/// overlong segments of ten words or fewer stay intact; anything else
/// shorter than the minimum duration is dropped. Pass two: a segment
/// shorter than twice the minimum duration merges into the segment that
/// follows it when the gap is under one second and the combined text still
/// fits, averaging confidence pairwise at each merge.
pub fn post_process(
    raw: Vec<RawTranscriptSegment>,
    options: &PostProcessOptions,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for raw_segment in raw {
        let text = clean_transcript_text(&raw_segment.text);
        if text.is_empty() {
            continue;
        }

        let char_count = text.chars().count();
        let word_count = text.split_whitespace().count();
        let duration = raw_segment.end_time - raw_segment.start_time;

        if char_count > options.max_subtitle_length {
            if word_count > 10 {
                let parts = split_text(&text, options.max_subtitle_length);
                let share = duration / parts.len() as f64;

                let mut cursor = raw_segment.start_time;
                for part in parts {
                    segments.push(Segment::with_details(
                        cursor,
                        cursor + share,
                        part,
                        raw_segment.confidence,
                        None,
                    ));
                    cursor += share;
                }
            } else {
                // Ten words or fewer read fine even when long, and skipping
                // them would lose whole phrases, so the duration floor does
                // not apply here
                segments.push(Segment::with_details(
                    raw_segment.start_time,
                    raw_segment.end_time,
                    text,
                    raw_segment.confidence,
                    None,
                ));
            }
        } else if duration >= options.min_subtitle_duration {
            segments.push(Segment::with_details(
                raw_segment.start_time,
                raw_segment.end_time,
                text,
                raw_segment.confidence,
                None,
            ));
        }
        // Short un-splittable segments carry too little signal to keep
    }

    merge_short_segments(segments, options)
}

fn merge_short_segments(segments: Vec<Segment>, options: &PostProcessOptions) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    let mut iter = segments.into_iter();
    let mut current = match iter.next() {
        Some(segment) => segment,
        None => return merged,
    };

    for next in iter {
        let absorb = current.duration() < 2.0 * options.min_subtitle_duration
            && next.start_time - current.end_time < 1.0
            && current.text.chars().count() + 1 + next.text.chars().count()
                < options.max_subtitle_length;

        if absorb {
            current.text.push(' ');
            current.text.push_str(&next.text);
            current.end_time = next.end_time;
            current.confidence = (current.confidence + next.confidence) / 2.0;
        } else {
            merged.push(current);
            current = next;
        }
    }

    merged.push(current);
    merged
}

/// Guess the dominant language from the first few segments by Unicode range.
///
/// Kana is checked before CJK ideographs since Japanese text usually mixes
/// both; the fallback is English.
pub fn detect_language_from_segments(segments: &[Segment]) -> String {
    let sample: String = segments
        .iter()
        .take(5)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut has_cjk = false;
    for c in sample.chars() {
        match c as u32 {
            0x3040..=0x30FF => return "ja".to_string(),
            0xAC00..=0xD7AF => return "ko".to_string(),
            0x0600..=0x06FF => return "ar".to_string(),
            0x0E00..=0x0E7F => return "th".to_string(),
            0x4E00..=0x9FFF => has_cjk = true,
            _ => {}
        }
    }

    if has_cjk {
        "zh".to_string()
    } else {
        "en".to_string()
    }
}
