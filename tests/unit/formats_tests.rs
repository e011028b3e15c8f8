/*!
 * Tests for the subtitle format codecs and the conversion registry
 */

use subgrab::errors::FormatError;
use subgrab::formats::{self, SubtitleFormat, TrackMeta};
use subgrab::subtitle_model::Segment;

fn sample_segments() -> Vec<Segment> {
    vec![
        Segment::new(1.0, 3.0, "Hello world"),
        Segment::new(4.5, 6.25, "Second line\nwith a break"),
    ]
}

fn sample_meta() -> TrackMeta {
    TrackMeta {
        language: "en".to_string(),
        language_name: "English".to_string(),
        is_auto_generated: false,
        source: "youtube_manual".to_string(),
    }
}

#[test]
fn test_fromExtension_withAllKnownNames_shouldResolve() {
    for format in SubtitleFormat::all() {
        let resolved = SubtitleFormat::from_extension(format.extension()).unwrap();
        assert_eq!(resolved, format);
    }
    assert_eq!(
        SubtitleFormat::from_extension(".SRT").unwrap(),
        SubtitleFormat::Srt
    );
    assert!(matches!(
        SubtitleFormat::from_extension("doc"),
        Err(FormatError::Unsupported(_))
    ));
}

/// The exact SRT byte layout: index, timestamp line, text, blank separator
#[test]
fn test_generateSrt_withSingleSegment_shouldMatchExactOutput() {
    let segments = vec![Segment::new(1.0, 3.0, "Hello world")];
    let content = formats::generate(SubtitleFormat::Srt, &segments, &sample_meta()).unwrap();
    assert_eq!(content, "1\n00:00:01,000 --> 00:00:03,000\nHello world\n\n");
}

#[test]
fn test_parseSrt_withIndexlessBlock_shouldStillParse() {
    let content = "00:00:01,000 --> 00:00:03,000\nNo index here\n";
    let segments = formats::parse(SubtitleFormat::Srt, content).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "No index here");
}

#[test]
fn test_srtRoundTrip_withMultilineText_shouldPreserveSegments() {
    let original = sample_segments();
    let content = formats::generate(SubtitleFormat::Srt, &original, &sample_meta()).unwrap();
    let parsed = formats::parse(SubtitleFormat::Srt, &content).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].start_time, 1.0);
    assert_eq!(parsed[0].end_time, 3.0);
    assert_eq!(parsed[1].text, "Second line\nwith a break");
}

#[test]
fn test_generateVtt_withLanguage_shouldEmitHeaderAndLanguageLine() {
    let content =
        formats::generate(SubtitleFormat::Vtt, &sample_segments(), &sample_meta()).unwrap();
    assert!(content.starts_with("WEBVTT\nLanguage: en\n"));
    assert!(content.contains("00:00:01.000 --> 00:00:03.000"));
}

#[test]
fn test_parseVtt_withInlineTags_shouldStripThem() {
    let content = "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\n<c.yellow>Styled</c> <b>text</b>\n";
    let segments = formats::parse(SubtitleFormat::Vtt, content).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "Styled text");
}

#[test]
fn test_vttRoundTrip_shouldPreserveSegments() {
    let original = sample_segments();
    let content = formats::generate(SubtitleFormat::Vtt, &original, &sample_meta()).unwrap();
    let parsed = formats::parse(SubtitleFormat::Vtt, &content).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].start_time, 4.5);
    assert_eq!(parsed[1].text, "Second line\nwith a break");
}

#[test]
fn test_generateAss_shouldCarryFullHeaderAndDialogue() {
    let content =
        formats::generate(SubtitleFormat::Ass, &sample_segments(), &sample_meta()).unwrap();
    assert!(content.contains("[Script Info]"));
    assert!(content.contains("ScriptType: v4.00+"));
    assert!(content.contains("[V4+ Styles]"));
    assert!(content.contains("Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,Hello world"));
    // Line breaks become \N in ASS
    assert!(content.contains("Second line\\Nwith a break"));
}

#[test]
fn test_generateSsa_shouldUseLegacyHeaderAndMarkedPrefix() {
    let content =
        formats::generate(SubtitleFormat::Ssa, &sample_segments(), &sample_meta()).unwrap();
    assert!(content.contains("ScriptType: v4.00"));
    assert!(!content.contains("v4.00+"));
    assert!(content.contains("[V4 Styles]"));
    assert!(content.contains("Dialogue: Marked=0,"));
    // SSA uses the lowercase break token
    assert!(content.contains("Second line\\nwith a break"));
}

#[test]
fn test_parseAss_withOverrideTags_shouldStripThem() {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\pos(10,10)}Tagged text";
    let segments = formats::parse(SubtitleFormat::Ass, content).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "Tagged text");
}

#[test]
fn test_assAndSsaRoundTrip_shouldPreserveSegments() {
    let original = sample_segments();
    for format in [SubtitleFormat::Ass, SubtitleFormat::Ssa] {
        let content = formats::generate(format, &original, &sample_meta()).unwrap();
        let parsed = formats::parse(format, &content).unwrap();
        assert_eq!(parsed.len(), 2, "{} round trip", format);
        assert_eq!(parsed[0].start_time, 1.0);
        assert_eq!(parsed[1].text, "Second line\nwith a break");
    }
}

#[test]
fn test_generateTxt_shouldEmitReadableStamps() {
    let content =
        formats::generate(SubtitleFormat::Txt, &sample_segments(), &sample_meta()).unwrap();
    assert_eq!(content, "[00:01] Hello world\n[00:04] Second line\nwith a break");
}

#[test]
fn test_parseTxt_shouldFailAsNotReversible() {
    assert!(matches!(
        formats::parse(SubtitleFormat::Txt, "[00:01] text"),
        Err(FormatError::NotReversible(_))
    ));
}

#[test]
fn test_generateJson_shouldCarryMetadataEnvelope() {
    let content =
        formats::generate(SubtitleFormat::Json, &sample_segments(), &sample_meta()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["metadata"]["language"], "en");
    assert_eq!(value["metadata"]["format"], "json");
    assert_eq!(value["metadata"]["total_segments"], 2);
    assert_eq!(value["metadata"]["source"], "youtube_manual");
    assert!(value["metadata"]["generated_at"].is_string());
    assert_eq!(value["subtitles"][0]["index"], 1);
    assert_eq!(value["subtitles"][0]["duration"], 2.0);
}

#[test]
fn test_jsonRoundTrip_shouldPreserveConfidenceAndLanguage() {
    let original = vec![Segment::with_details(
        1.5,
        3.5,
        "hello",
        0.75,
        Some("ja".to_string()),
    )];
    let content = formats::generate(SubtitleFormat::Json, &original, &sample_meta()).unwrap();
    let parsed = formats::parse(SubtitleFormat::Json, &content).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_csvRoundTrip_withEmbeddedNewlineAndComma_shouldPreserveText() {
    let original = vec![
        Segment::new(1.0, 2.5, "line one\nline two"),
        Segment::new(3.0, 4.0, "a, b, and c"),
    ];
    let content = formats::generate(SubtitleFormat::Csv, &original, &sample_meta()).unwrap();
    assert!(content.starts_with("Index,Start Time,End Time,Duration,Text,Confidence,Language"));
    // The newline is escaped in the file itself
    assert!(content.contains("line one | line two"));

    let parsed = formats::parse(SubtitleFormat::Csv, &content).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].text, "line one\nline two");
    assert_eq!(parsed[1].text, "a, b, and c");
    assert_eq!(parsed[1].start_time, 3.0);
}

#[test]
fn test_generateXml_shouldEscapeReservedCharacters() {
    let segments = vec![Segment::new(0.0, 1.0, "a < b & \"c\"")];
    let content = formats::generate(SubtitleFormat::Xml, &segments, &sample_meta()).unwrap();
    assert!(content.contains("a &lt; b &amp; &quot;c&quot;"));

    let parsed = formats::parse(SubtitleFormat::Xml, &content).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].text, "a < b & \"c\"");
}

#[test]
fn test_xmlRoundTrip_shouldPreserveAttributes() {
    let original = vec![Segment::with_details(
        1.5,
        4.0,
        "hello",
        0.5,
        Some("ko".to_string()),
    )];
    let content = formats::generate(SubtitleFormat::Xml, &original, &sample_meta()).unwrap();
    let parsed = formats::parse(SubtitleFormat::Xml, &content).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_generateTtml_shouldEmitNamespacedDocument() {
    let content =
        formats::generate(SubtitleFormat::Ttml, &sample_segments(), &sample_meta()).unwrap();
    assert!(content.contains("<tt xmlns=\"http://www.w3.org/ns/ttml\""));
    assert!(content.contains("xml:lang=\"en\""));
    assert!(content.contains("<p begin=\"1.000s\" end=\"3.000s\" style=\"defaultStyle\">"));
    // Line breaks become br elements
    assert!(content.contains("Second line<br/>with a break"));
}

#[test]
fn test_ttmlRoundTrip_shouldPreserveSegments() {
    let original = sample_segments();
    let content = formats::generate(SubtitleFormat::Ttml, &original, &sample_meta()).unwrap();
    let parsed = formats::parse(SubtitleFormat::Ttml, &content).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].start_time, 1.0);
    assert_eq!(parsed[1].text, "Second line\nwith a break");
}

/// DFXP is the same document model as TTML in both directions
#[test]
fn test_dfxp_shouldAliasTtml() {
    let segments = sample_segments();
    let ttml = formats::generate(SubtitleFormat::Ttml, &segments, &sample_meta()).unwrap();
    let dfxp = formats::generate(SubtitleFormat::Dfxp, &segments, &sample_meta()).unwrap();
    assert_eq!(ttml, dfxp);

    let parsed = formats::parse(SubtitleFormat::Dfxp, &ttml).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_generate_withNoSegments_shouldFailWithEmptyTrack() {
    for format in SubtitleFormat::all() {
        let err = formats::generate(format, &[], &sample_meta()).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<FormatError>(),
                Some(FormatError::EmptyTrack)
            ),
            "{} should reject an empty track",
            format
        );
    }
}

/// A parser that finds no well-formed cues returns an empty vector
#[test]
fn test_parse_withMalformedContent_shouldReturnEmptyVec() {
    for format in SubtitleFormat::all() {
        if !format.can_parse() {
            continue;
        }
        let parsed = formats::parse(format, "complete nonsense").unwrap();
        assert!(parsed.is_empty(), "{} should yield no cues", format);
    }
}

#[test]
fn test_parseSrt_withPartiallyMalformedBlocks_shouldSkipBadOnes() {
    let content = "1\nnot a timestamp\nBad block\n\n2\n00:00:05,000 --> 00:00:06,000\nGood block\n";
    let segments = formats::parse(SubtitleFormat::Srt, content).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "Good block");
}
