/*!
 * Tests for the subtitle data model and the segment validator
 */

use subgrab::subtitle_model::{
    make_track, validate_segments, Segment, TrackQuality, VideoInfo,
};

#[test]
fn test_segmentDuration_shouldBeEndMinusStart() {
    let segment = Segment::new(1.5, 4.0, "hi");
    assert_eq!(segment.duration(), 2.5);
    assert_eq!(segment.confidence, 1.0);
    assert!(segment.language.is_none());
}

#[test]
fn test_validateSegments_withValidInput_shouldReportNothing() {
    let segments = vec![
        Segment::new(0.0, 2.0, "one"),
        Segment::new(2.0, 4.0, "two"),
    ];
    assert!(validate_segments(&segments).is_empty());
}

/// Issue reports carry the 1-based segment index
#[test]
fn test_validateSegments_withBadSegments_shouldReportOneBasedIndexes() {
    let segments = vec![
        Segment::new(0.0, 2.0, "fine"),
        Segment::new(5.0, 3.0, "backwards"),
        Segment::new(2.0, 6.0, "   "),
        Segment::with_details(7.0, 8.0, "overconfident", 1.5, None),
    ];
    let issues = validate_segments(&segments);

    assert!(issues.iter().any(|i| i.contains("Segment 2") && i.contains("start time")));
    assert!(issues.iter().any(|i| i.contains("Segment 3") && i.contains("overlaps")));
    assert!(issues.iter().any(|i| i.contains("Segment 3") && i.contains("empty text")));
    assert!(issues.iter().any(|i| i.contains("Segment 4") && i.contains("confidence")));
    assert!(!issues.iter().any(|i| i.contains("Segment 1")));
}

#[test]
fn test_validateSegments_withZeroDurationSegment_shouldReportIt() {
    let issues = validate_segments(&[Segment::new(1.0, 1.0, "instant")]);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].contains("Segment 1"));
}

#[test]
fn test_makeTrack_shouldFillDisplayName() {
    let track = make_track(
        "ja",
        false,
        "vtt",
        Some("https://example.com/sub.vtt".to_string()),
        vec![Segment::new(0.0, 2.0, "one"), Segment::new(3.0, 5.5, "two")],
        TrackQuality::High,
        "youtube_manual",
    );
    assert_eq!(track.language_name, "Japanese");
    assert_eq!(track.total_duration(), 5.5);
    assert!(!track.is_auto_generated);
}

#[test]
fn test_makeTrack_withUnknownTag_shouldFallBackToTag() {
    let track = make_track("xx-YY", true, "vtt", None, vec![], TrackQuality::Unknown, "generic_auto");
    assert_eq!(track.language_name, "xx-YY");
    assert_eq!(track.total_duration(), 0.0);
}

#[test]
fn test_videoInfo_hasSubtitles_shouldCheckBothLists() {
    let mut info = VideoInfo {
        id: String::new(),
        title: String::new(),
        duration: 0.0,
        uploader: String::new(),
        upload_date: String::new(),
        view_count: 0,
        description: String::new(),
        thumbnail: String::new(),
        webpage_url: String::new(),
        platform: String::new(),
        available_subtitle_languages: vec![],
        automatic_caption_languages: vec![],
    };
    assert!(!info.has_subtitles());

    info.automatic_caption_languages.push("en".to_string());
    assert!(info.has_subtitles());
}
