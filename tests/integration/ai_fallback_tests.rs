/*!
 * Tests for the transcription fallback path of the pipeline
 */

use std::sync::Arc;

use subgrab::downloader::{DownloadRequest, Downloader};
use subgrab::formats::SubtitleFormat;
use subgrab::transcribe::AiCapabilities;

use crate::common::create_temp_dir;
use crate::common::mock_collaborators::{raw_media_info, MockEngine, MockTranscriber};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=vid123";

fn whisper_caps() -> AiCapabilities {
    AiCapabilities {
        whisper: true,
        speech_recognition: false,
        translate: false,
    }
}

fn fallback_request(output_dir: &std::path::Path) -> DownloadRequest {
    let mut request = DownloadRequest::new(VIDEO_URL);
    request.languages = vec!["en".to_string()];
    request.formats = vec![SubtitleFormat::Srt];
    request.ai_fallback = true;
    request.ai_model = "base".to_string();
    request.output_dir = output_dir.to_path_buf();
    request
}

#[tokio::test]
async fn test_download_withNoSubtitlesAndFallbackEnabled_shouldTranscribe() {
    let engine = Arc::new(MockEngine::new(raw_media_info(vec![], vec![])));
    let transcriber = Arc::new(MockTranscriber::english_sample());
    let call_count = transcriber.call_count.clone();

    let downloader =
        Downloader::new(engine.clone(), whisper_caps()).with_transcriber(transcriber);

    let dir = create_temp_dir().unwrap();
    let result = downloader.download(&fallback_request(dir.path())).await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert!(result.ai_generated);
    assert_eq!(*call_count.lock().unwrap(), 1);

    assert_eq!(result.tracks.len(), 1);
    let track = &result.tracks[0];
    assert_eq!(track.source, "ai_base");
    assert_eq!(track.language, "en");
    assert!(track.is_auto_generated);
    assert_eq!(track.segments.len(), 2);
    assert_eq!(track.segments[0].text, "Hello from the transcriber");

    assert_eq!(result.downloaded_files.len(), 1);
    assert!(result.downloaded_files[0].exists());

    let stats = downloader.get_stats();
    assert_eq!(stats.ai_generated, 1);
}

/// The downloaded audio is a temp file and must not outlive the request
#[tokio::test]
async fn test_transcribeFallback_shouldCleanUpTempAudio() {
    let engine = Arc::new(MockEngine::new(raw_media_info(vec![], vec![])));
    let audio_paths = engine.audio_paths.clone();

    let downloader = Downloader::new(engine, whisper_caps())
        .with_transcriber(Arc::new(MockTranscriber::english_sample()));

    let dir = create_temp_dir().unwrap();
    let result = downloader.download(&fallback_request(dir.path())).await;
    assert!(result.success, "errors: {:?}", result.errors);

    let recorded = audio_paths.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(!recorded[0].exists(), "temp audio file was left behind");
}

#[tokio::test]
async fn test_download_withFallbackEnabledButNoTranscriber_shouldCollectError() {
    // Capabilities claim whisper but no engine was wired in
    let downloader = Downloader::new(
        Arc::new(MockEngine::new(raw_media_info(vec![], vec![]))),
        whisper_caps(),
    );

    let dir = create_temp_dir().unwrap();
    let result = downloader.download(&fallback_request(dir.path())).await;

    assert!(!result.success);
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("AI fallback failed")));
}

#[tokio::test]
async fn test_download_withFallbackDisabledInRequest_shouldNotTranscribe() {
    let transcriber = Arc::new(MockTranscriber::english_sample());
    let call_count = transcriber.call_count.clone();

    let downloader = Downloader::new(
        Arc::new(MockEngine::new(raw_media_info(vec![], vec![]))),
        whisper_caps(),
    )
    .with_transcriber(transcriber);

    let dir = create_temp_dir().unwrap();
    let mut request = fallback_request(dir.path());
    request.ai_fallback = false;

    let result = downloader.download(&request).await;
    assert!(!result.success);
    assert!(!result.ai_generated);
    assert_eq!(*call_count.lock().unwrap(), 0);
}

/// An undetected language falls back to Unicode-range detection
#[tokio::test]
async fn test_transcribeFallback_withoutReportedLanguage_shouldDetectFromText() {
    use subgrab::transcribe::RawTranscriptSegment;

    let segments = vec![RawTranscriptSegment {
        start_time: 0.0,
        end_time: 3.0,
        text: "\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}".to_string(),
        confidence: 0.9,
    }];
    let downloader = Downloader::new(
        Arc::new(MockEngine::new(raw_media_info(vec![], vec![]))),
        whisper_caps(),
    )
    .with_transcriber(Arc::new(MockTranscriber::new(segments, None)));

    let dir = create_temp_dir().unwrap();
    let result = downloader.download(&fallback_request(dir.path())).await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.tracks[0].language, "ja");
}
