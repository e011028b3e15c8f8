/*!
 * Subtitle format codecs.
 *
 * Each sub-module implements one output format; this module owns the
 * format registry and dispatches generation and parsing. All formats can
 * be generated; plain text is the only one that cannot be parsed back.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use crate::errors::FormatError;
use crate::subtitle_model::{Segment, Track};

pub mod ass;
pub mod csv;
pub mod json;
pub mod srt;
pub mod timecode;
pub mod ttml;
pub mod txt;
pub mod vtt;
pub mod xml;

/// Identifier for every subtitle format the converter knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
    Ssa,
    Txt,
    Json,
    Csv,
    Xml,
    Ttml,
    Dfxp,
}

impl SubtitleFormat {
    /// Every supported format, in the order shown to users
    pub fn all() -> [SubtitleFormat; 10] {
        [
            Self::Srt,
            Self::Vtt,
            Self::Ass,
            Self::Ssa,
            Self::Txt,
            Self::Json,
            Self::Csv,
            Self::Xml,
            Self::Ttml,
            Self::Dfxp,
        ]
    }

    /// Resolve a format from a file extension or format name,
    /// case-insensitively and with an optional leading dot
    pub fn from_extension(ext: &str) -> Result<Self, FormatError> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            "ssa" => Ok(Self::Ssa),
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            "ttml" => Ok(Self::Ttml),
            "dfxp" => Ok(Self::Dfxp),
            other => Err(FormatError::Unsupported(other.to_string())),
        }
    }

    /// The canonical file extension, without a dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Ssa => "ssa",
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Ttml => "ttml",
            Self::Dfxp => "dfxp",
        }
    }

    /// Whether content in this format can be parsed back into segments
    pub fn can_parse(&self) -> bool {
        !matches!(self, Self::Txt)
    }

    /// MIME type for serving or uploading converted output
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Srt => "application/x-subrip",
            Self::Vtt => "text/vtt",
            Self::Ass | Self::Ssa => "text/x-ssa",
            Self::Txt => "text/plain",
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Xml => "application/xml",
            Self::Ttml | Self::Dfxp => "application/ttml+xml",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Track-level fields the codecs embed in headers and metadata blocks
#[derive(Debug, Clone, Default)]
pub struct TrackMeta {
    pub language: String,
    pub language_name: String,
    pub is_auto_generated: bool,
    pub source: String,
}

impl From<&Track> for TrackMeta {
    fn from(track: &Track) -> Self {
        Self {
            language: track.language.clone(),
            language_name: track.language_name.clone(),
            is_auto_generated: track.is_auto_generated,
            source: track.source.clone(),
        }
    }
}

/// Generate subtitle content in the requested format.
///
/// Fails with [`FormatError::EmptyTrack`] when there are no segments, so
/// callers never write empty subtitle files.
pub fn generate(
    format: SubtitleFormat,
    segments: &[Segment],
    meta: &TrackMeta,
) -> Result<String> {
    if segments.is_empty() {
        return Err(FormatError::EmptyTrack.into());
    }

    let content = match format {
        SubtitleFormat::Srt => srt::generate(segments, meta),
        SubtitleFormat::Vtt => vtt::generate(segments, meta),
        SubtitleFormat::Ass => ass::generate_ass(segments, meta),
        SubtitleFormat::Ssa => ass::generate_ssa(segments, meta),
        SubtitleFormat::Txt => txt::generate(segments, meta),
        SubtitleFormat::Json => json::generate(segments, meta)?,
        SubtitleFormat::Csv => csv::generate(segments, meta),
        SubtitleFormat::Xml => xml::generate(segments, meta),
        SubtitleFormat::Ttml | SubtitleFormat::Dfxp => ttml::generate(segments, meta),
    };

    Ok(content)
}

/// Parse subtitle content in the given format back into segments.
///
/// Malformed individual cues are skipped rather than failing the whole
/// document; entirely unparseable content yields an empty vector.
pub fn parse(format: SubtitleFormat, content: &str) -> Result<Vec<Segment>, FormatError> {
    let segments = match format {
        SubtitleFormat::Srt => srt::parse(content),
        SubtitleFormat::Vtt => vtt::parse(content),
        SubtitleFormat::Ass | SubtitleFormat::Ssa => ass::parse(content),
        SubtitleFormat::Txt => {
            return Err(FormatError::NotReversible("txt".to_string()));
        }
        SubtitleFormat::Json => json::parse(content),
        SubtitleFormat::Csv => csv::parse(content),
        SubtitleFormat::Xml => xml::parse(content),
        SubtitleFormat::Ttml | SubtitleFormat::Dfxp => ttml::parse(content),
    };

    Ok(segments)
}
