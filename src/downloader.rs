/*!
 * Download orchestration.
 *
 * The [`Downloader`] owns the full pipeline for one request: adapter
 * selection, metadata, track extraction, the AI transcription fallback,
 * optional translation, and file output. Collaborators (extraction engine,
 * transcriber, translator) are injected so the pipeline can run against
 * mocks. No error escapes the orchestrator; every failure mode lands in
 * `DownloadResult.errors`.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::app_config::Config;
use crate::extractors::{ExtractionEngine, ExtractorRegistry};
use crate::file_utils;
use crate::formats::{self, SubtitleFormat, TrackMeta};
use crate::language_utils;
use crate::subtitle_model::{Track, VideoInfo};
use crate::transcribe::{
    model_lock, track_from_transcription, AiCapabilities, PostProcessOptions, Transcriber,
    TranscriptionOptions,
};
use crate::translation::{translate_track, Translator};

/// Everything needed to process one video URL; built once, never mutated
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub languages: Vec<String>,
    pub formats: Vec<SubtitleFormat>,
    /// Transcribe the audio when no subtitles exist
    pub ai_fallback: bool,
    pub ai_model: String,
    /// Target language for track translation, when set
    pub translate_to: Option<String>,
    pub output_dir: PathBuf,
    pub filename_template: String,
    /// In-flight cap applied when the request runs as part of a batch
    pub concurrency: usize,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            languages: vec!["zh-CN".to_string(), "en".to_string()],
            formats: vec![SubtitleFormat::Srt, SubtitleFormat::Vtt],
            ai_fallback: false,
            ai_model: "base".to_string(),
            translate_to: None,
            output_dir: PathBuf::from("subtitles"),
            filename_template: "{title}_{language}.{format}".to_string(),
            concurrency: 3,
        }
    }

    /// Build a request from the application config
    pub fn from_config(url: impl Into<String>, config: &Config) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            languages: config.languages.clone(),
            formats: config.output_formats()?,
            ai_fallback: config.ai.capabilities.can_transcribe(),
            ai_model: config.ai.model.clone(),
            translate_to: if config.translation.enabled {
                config.translation.target_language.clone()
            } else {
                None
            },
            output_dir: PathBuf::from(&config.output_dir),
            filename_template: config.filename_template.clone(),
            concurrency: config.concurrency,
        })
    }
}

/// Outcome of one request. `success` holds exactly when at least one
/// track was obtained.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub success: bool,
    pub url: String,
    pub video_info: Option<VideoInfo>,
    pub tracks: Vec<Track>,
    pub downloaded_files: Vec<PathBuf>,
    /// Whether any track came from AI transcription
    pub ai_generated: bool,
    pub errors: Vec<String>,
    /// Wall-clock seconds for the whole request
    pub processing_time: f64,
    pub total_segments: usize,
}

impl DownloadResult {
    fn empty(url: &str) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            video_info: None,
            tracks: Vec::new(),
            downloaded_files: Vec::new(),
            ai_generated: false,
            errors: Vec::new(),
            processing_time: 0.0,
            total_segments: 0,
        }
    }
}

/// Running totals across the lifetime of one orchestrator
#[derive(Debug, Clone, Default)]
pub struct DownloadStats {
    pub total_requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub ai_generated: u64,
    pub total_time: f64,
}

impl DownloadStats {
    /// Fraction of requests that produced at least one track
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_requests as f64
        }
    }

    /// Mean wall-clock seconds per request
    pub fn average_time(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_time / self.total_requests as f64
        }
    }
}

pub struct Downloader {
    registry: ExtractorRegistry,
    engine: Arc<dyn ExtractionEngine>,
    transcriber: Option<Arc<dyn Transcriber>>,
    translator: Option<Arc<dyn Translator>>,
    capabilities: AiCapabilities,
    post_options: PostProcessOptions,
    stats: Mutex<DownloadStats>,
}

impl Downloader {
    pub fn new(engine: Arc<dyn ExtractionEngine>, capabilities: AiCapabilities) -> Self {
        let http = reqwest::Client::new();
        Self {
            registry: ExtractorRegistry::new(engine.clone(), http),
            engine,
            transcriber: None,
            translator: None,
            capabilities,
            post_options: PostProcessOptions::default(),
            stats: Mutex::new(DownloadStats::default()),
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_post_options(mut self, options: PostProcessOptions) -> Self {
        self.post_options = options;
        self
    }

    /// Whether some adapter accepts this URL
    pub fn validate_url(&self, url: &str) -> bool {
        self.registry.select(url).is_ok()
    }

    /// Normalized metadata for a video, without downloading anything
    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        let extractor = self.registry.select(url)?;
        extractor.extract_video_info(url).await
    }

    /// Manual and automatic subtitle languages a video offers
    pub async fn list_available_subtitles(
        &self,
        url: &str,
    ) -> Result<(Vec<String>, Vec<String>)> {
        let info = self.get_video_info(url).await?;
        Ok((
            info.available_subtitle_languages,
            info.automatic_caption_languages,
        ))
    }

    /// Process one request end to end. Never fails; all errors are
    /// collected into the result.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadResult {
        let started = Instant::now();
        let mut result = DownloadResult::empty(&request.url);
        info!("Processing {}", request.url);

        let extractor = match self.registry.select(&request.url) {
            Ok(extractor) => Some(extractor),
            Err(e) => {
                result.errors.push(e.to_string());
                None
            }
        };

        if let Some(extractor) = extractor {
            match extractor.extract_video_info(&request.url).await {
                Ok(info) => result.video_info = Some(info),
                Err(e) => result.errors.push(format!("Metadata lookup failed: {}", e)),
            }

            if result.video_info.is_some() {
                match extractor
                    .extract_tracks(&request.url, &request.languages)
                    .await
                {
                    Ok(tracks) => result.tracks = tracks,
                    Err(e) => result.errors.push(format!("Extraction failed: {}", e)),
                }
            }
        }

        if result.tracks.is_empty() && result.video_info.is_some() {
            if request.ai_fallback && self.capabilities.can_transcribe() {
                match self.transcribe_fallback(request).await {
                    Ok(track) => {
                        info!(
                            "AI fallback produced {} segments ({})",
                            track.segments.len(),
                            track.source
                        );
                        result.tracks.push(track);
                        result.ai_generated = true;
                    }
                    Err(e) => result.errors.push(format!("AI fallback failed: {}", e)),
                }
            } else {
                result
                    .errors
                    .push("No subtitles available for the requested languages".to_string());
            }
        }

        if let Some(target) = &request.translate_to {
            self.translate_stage(&mut result, target).await;
        }

        if !result.tracks.is_empty() {
            if let Some(info) = result.video_info.clone() {
                self.write_outputs(request, &info, &mut result);
            }
        }

        result.success = !result.tracks.is_empty();
        result.total_segments = result.tracks.iter().map(|t| t.segments.len()).sum();
        result.processing_time = started.elapsed().as_secs_f64();

        self.record(&result);
        result
    }

    /// Download audio to a temp file and transcribe it. The temp file is
    /// removed on every exit path by its drop guard.
    async fn transcribe_fallback(&self, request: &DownloadRequest) -> Result<Track> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or(crate::errors::TranscriptionError::NoModelAvailable)?;

        let audio = tempfile::Builder::new()
            .prefix("subgrab_audio_")
            .suffix(".m4a")
            .tempfile()?;
        debug!("Downloading audio to {}", audio.path().display());
        self.engine
            .download_audio(&request.url, audio.path())
            .await?;

        let options = TranscriptionOptions {
            model: request.ai_model.clone(),
            language: request.languages.first().cloned(),
        };

        // One transcription per model at a time
        let lock = model_lock(&request.ai_model);
        let outcome = {
            let _guard = lock.lock().await;
            transcriber.transcribe(audio.path(), &options).await?
        };

        let track = track_from_transcription(outcome, &self.post_options)?;
        Ok(track)
    }

    /// Replace every track not already in the target language with its
    /// translation. A failed translation keeps the original track and is
    /// recorded as a warning.
    async fn translate_stage(&self, result: &mut DownloadResult, target: &str) {
        let translator = match (&self.translator, self.capabilities.translate) {
            (Some(translator), true) => translator.clone(),
            _ => {
                if !result.tracks.is_empty() {
                    warn!("Translation requested but no translator is configured");
                }
                return;
            }
        };

        let tracks = std::mem::take(&mut result.tracks);
        for track in tracks {
            if language_utils::language_matches(&track.language, target) {
                result.tracks.push(track);
                continue;
            }
            match translate_track(translator.as_ref(), &track, target).await {
                Ok(new_track) => result.tracks.push(new_track),
                Err(e) => {
                    warn!("Translation of '{}' track failed: {}", track.language, e);
                    result
                        .errors
                        .push(format!("Translation failed for {}: {}", track.language, e));
                    result.tracks.push(track);
                }
            }
        }
    }

    /// Convert and write every track in every requested format. Each
    /// failure is logged and skipped; a partial write never survives.
    fn write_outputs(
        &self,
        request: &DownloadRequest,
        info: &VideoInfo,
        result: &mut DownloadResult,
    ) {
        for track in &result.tracks {
            let meta = TrackMeta::from(track);
            for format in &request.formats {
                let content = match formats::generate(*format, &track.segments, &meta) {
                    Ok(content) => content,
                    Err(e) => {
                        result
                            .errors
                            .push(format!("{} conversion failed: {}", format, e));
                        continue;
                    }
                };

                let name =
                    file_utils::render_filename(&request.filename_template, info, track, *format);
                let path = request.output_dir.join(name);
                match file_utils::write_atomic(&path, &content) {
                    Ok(()) => {
                        debug!("Wrote {}", path.display());
                        result.downloaded_files.push(path);
                    }
                    Err(e) => result.errors.push(format!("Write failed: {}", e)),
                }
            }
        }
    }

    fn record(&self, result: &DownloadResult) {
        let mut stats = self.stats.lock();
        stats.total_requests += 1;
        if result.success {
            stats.successes += 1;
        } else {
            stats.failures += 1;
        }
        if result.ai_generated {
            stats.ai_generated += 1;
        }
        stats.total_time += result.processing_time;
    }

    /// Snapshot of the running totals
    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().clone()
    }

    /// Process many requests concurrently with a bounded in-flight cap.
    /// Failures stay isolated to their own result.
    pub async fn batch_download(
        &self,
        requests: Vec<DownloadRequest>,
        concurrency: usize,
    ) -> Vec<DownloadResult> {
        let total = requests.len() as u64;
        let progress = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
        {
            progress.set_style(style);
        }

        let results: Vec<DownloadResult> = stream::iter(requests)
            .map(|request| {
                let progress = progress.clone();
                async move {
                    let result = self.download(&request).await;
                    progress.inc(1);
                    result
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        progress.finish_and_clear();
        let ok = results.iter().filter(|r| r.success).count();
        info!("Batch finished: {}/{} succeeded", ok, results.len());
        results
    }

    /// Platform names with dedicated or generic support
    pub fn supported_platforms() -> Vec<&'static str> {
        vec!["youtube", "bilibili", "generic"]
    }
}

/// Language tags accepted in requests
pub fn supported_languages() -> &'static [(&'static str, &'static str)] {
    &language_utils::SUPPORTED_LANGUAGES
}

/// Every output format the converter supports
pub fn supported_formats() -> [SubtitleFormat; 10] {
    SubtitleFormat::all()
}
