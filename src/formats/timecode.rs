/*!
 * Timestamp conversions between seconds and the textual clock notations
 * used by the subtitle formats.
 *
 * All seconds-to-text conversions truncate to the format's sub-second
 * resolution rather than rounding. All text-to-seconds parses accept both
 * `,` and `.` as the sub-second separator.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static OFFSET_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(\d+(?:\.\d+)?)h)?(?:(\d+(?:\.\d+)?)m)?(?:(\d+(?:\.\d+)?)s)?").unwrap()
});

/// Split seconds into (hours, minutes, whole seconds, milliseconds), truncating
fn split_seconds(seconds: f64) -> (u64, u64, u64, u64) {
    let total_millis = (seconds.max(0.0) * 1000.0) as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1_000;
    let millis = total_millis % 1_000;
    (hours, minutes, secs, millis)
}

/// Format seconds as SRT time `HH:MM:SS,mmm`
pub fn seconds_to_srt(seconds: f64) -> String {
    let (h, m, s, ms) = split_seconds(seconds);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Format seconds as VTT time `HH:MM:SS.mmm`
pub fn seconds_to_vtt(seconds: f64) -> String {
    let (h, m, s, ms) = split_seconds(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Format seconds as ASS time `H:MM:SS.cc` (centiseconds)
pub fn seconds_to_ass(seconds: f64) -> String {
    let (h, m, s, ms) = split_seconds(seconds);
    format!("{}:{:02}:{:02}.{:02}", h, m, s, ms / 10)
}

/// Format seconds as TTML offset time `SS.mmms`
pub fn seconds_to_ttml(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0) as u64;
    format!("{}.{:03}s", total_millis / 1000, total_millis % 1000)
}

/// Format seconds as a human-readable `MM:SS` or `HH:MM:SS` stamp
///
/// Hours are omitted when zero.
pub fn seconds_to_readable(seconds: f64) -> String {
    let (h, m, s, _) = split_seconds(seconds);
    if h > 0 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Parse a clock-style time (`HH:MM:SS.mmm`, `HH:MM:SS,mmm` or `MM:SS.mmm`)
pub fn parse_clock_time(time_str: &str) -> Option<f64> {
    let normalized = time_str.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    match parts.len() {
        3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let minutes: u64 = parts[1].parse().ok()?;
            let seconds: f64 = parts[2].parse().ok()?;
            Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
        }
        2 => {
            let minutes: u64 = parts[0].parse().ok()?;
            let seconds: f64 = parts[1].parse().ok()?;
            Some(minutes as f64 * 60.0 + seconds)
        }
        _ => None,
    }
}

/// Parse an ASS time `H:MM:SS.cc`
pub fn parse_ass_time(time_str: &str) -> Option<f64> {
    let normalized = time_str.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: u64 = parts[0].parse().ok()?;
    let minutes: u64 = parts[1].parse().ok()?;
    let (secs_part, centis_part) = match parts[2].split_once('.') {
        Some((s, c)) => (s, c),
        None => (parts[2], "0"),
    };
    let seconds: u64 = secs_part.parse().ok()?;
    let centis: u64 = centis_part.parse().ok()?;

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + centis as f64 / 100.0)
}

/// Parse a TTML time expression
///
/// Accepts `12.345s`, `340ms`, clock syntax, and the offset syntax `1h2m3.5s`.
pub fn parse_ttml_time(time_str: &str) -> Option<f64> {
    let trimmed = time_str.trim();

    if let Some(millis) = trimmed.strip_suffix("ms") {
        return millis.parse::<f64>().ok().map(|v| v / 1000.0);
    }

    if trimmed.contains(':') {
        return parse_clock_time(trimmed);
    }

    if let Some(secs) = trimmed.strip_suffix('s') {
        if let Ok(value) = secs.parse::<f64>() {
            return Some(value);
        }
    }

    // Offset syntax like 1h2m3.5s
    if trimmed.contains('h') || trimmed.contains('m') || trimmed.contains('s') {
        if let Some(caps) = OFFSET_TIME_REGEX.captures(trimmed) {
            let hours: f64 = caps.get(1).map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
            let minutes: f64 = caps.get(2).map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
            let seconds: f64 = caps.get(3).map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
            if hours > 0.0 || minutes > 0.0 || seconds > 0.0 {
                return Some(hours * 3600.0 + minutes * 60.0 + seconds);
            }
        }
    }

    trimmed.parse::<f64>().ok()
}
