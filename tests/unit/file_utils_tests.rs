/*!
 * Tests for output naming and atomic file writing
 */

use subgrab::file_utils::{ensure_dir, render_filename, sanitize_filename, write_atomic};
use subgrab::formats::SubtitleFormat;
use subgrab::subtitle_model::{make_track, Segment, TrackQuality, VideoInfo};

use crate::common::create_temp_dir;

fn video() -> VideoInfo {
    VideoInfo {
        id: "abc123".to_string(),
        title: "My Video".to_string(),
        duration: 60.0,
        uploader: "channel".to_string(),
        upload_date: "20240501".to_string(),
        view_count: 10,
        description: String::new(),
        thumbnail: String::new(),
        webpage_url: "https://example.com/v".to_string(),
        platform: "youtube".to_string(),
        available_subtitle_languages: vec!["en".to_string()],
        automatic_caption_languages: vec![],
    }
}

fn track() -> subgrab::subtitle_model::Track {
    make_track(
        "en",
        false,
        "vtt",
        None,
        vec![Segment::new(0.0, 1.0, "hi")],
        TrackQuality::High,
        "youtube_manual",
    )
}

#[test]
fn test_sanitizeFilename_withInvalidCharacters_shouldReplaceWithUnderscore() {
    assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "a_b_c_d_e_f_g_h_i_j");
    assert_eq!(sanitize_filename("normal name"), "normal name");
}

#[test]
fn test_sanitizeFilename_withLongName_shouldTruncateTo100Chars() {
    let long = "x".repeat(250);
    assert_eq!(sanitize_filename(&long).chars().count(), 100);
}

#[test]
fn test_renderFilename_withDefaultTemplate_shouldSubstitutePlaceholders() {
    let name = render_filename(
        "{title}_{language}.{format}",
        &video(),
        &track(),
        SubtitleFormat::Srt,
    );
    assert_eq!(name, "My Video_en.srt");
}

#[test]
fn test_renderFilename_withAllPlaceholders_shouldSubstituteEverything() {
    let name = render_filename(
        "{platform}/{uploader}/{id}_{language_name}_{quality}_{source}.{format}",
        &video(),
        &track(),
        SubtitleFormat::Json,
    );
    assert_eq!(name, "youtube/channel/abc123_English_high_youtube_manual.json");
}

#[test]
fn test_writeAtomic_shouldCreateParentsAndLeaveNoPartial() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("nested/deep/out.srt");

    write_atomic(&path, "subtitle content").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "subtitle content");
    let partial = path.parent().unwrap().join("out.srt.part");
    assert!(!partial.exists());
}

#[test]
fn test_writeAtomic_withExistingFile_shouldReplaceContent() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("out.srt");

    write_atomic(&path, "first").unwrap();
    write_atomic(&path, "second").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn test_ensureDir_withExistingDir_shouldSucceed() {
    let dir = create_temp_dir().unwrap();
    ensure_dir(dir.path()).unwrap();
    ensure_dir(&dir.path().join("a/b/c")).unwrap();
    assert!(dir.path().join("a/b/c").is_dir());
}
