use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::downloader::{DownloadRequest, DownloadResult, Downloader};
use crate::extractors::engine::YtDlpEngine;
use crate::formats::SubtitleFormat;
use crate::language_utils;
use crate::transcribe::whisper_cli::WhisperCliTranscriber;

/// Application controller module
/// Wires the configuration to the download orchestrator and drives the
/// CLI commands.
pub struct Controller {
    config: Config,
    downloader: Downloader,
}

impl Controller {
    /// Create a controller from a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let engine = Arc::new(YtDlpEngine::new());
        let mut downloader = Downloader::new(engine, config.ai.capabilities)
            .with_post_options(config.ai.post_process_options());

        if config.ai.capabilities.whisper {
            downloader = downloader.with_transcriber(Arc::new(WhisperCliTranscriber::new()));
        }
        if config.translation.enabled {
            // Translation needs a configured service; the capability flag
            // alone is not enough to wire one up.
            warn!("Translation is enabled in config but no translation service is configured");
        }

        Ok(Self { config, downloader })
    }

    /// Download subtitles for one or more URLs
    pub async fn download(&self, urls: Vec<String>) -> Result<()> {
        let mut requests = Vec::with_capacity(urls.len());
        for url in &urls {
            if !self.downloader.validate_url(url) {
                warn!("Skipping unsupported URL: {}", url);
                continue;
            }
            requests.push(DownloadRequest::from_config(url, &self.config)?);
        }
        if requests.is_empty() {
            return Err(anyhow!("No supported URLs to process"));
        }

        let results = if requests.len() == 1 {
            let request = &requests[0];
            vec![self.downloader.download(request).await]
        } else {
            let cap = requests.iter().map(|r| r.concurrency).max().unwrap_or(1);
            self.downloader.batch_download(requests, cap).await
        };

        let mut failures = 0;
        for result in &results {
            self.print_result(result);
            if !result.success {
                failures += 1;
            }
        }

        let stats = self.downloader.get_stats();
        info!(
            "Done: {}/{} succeeded, {} AI-generated, {:.1}s average",
            stats.successes,
            stats.total_requests,
            stats.ai_generated,
            stats.average_time()
        );

        if failures == results.len() {
            return Err(anyhow!("All downloads failed"));
        }
        Ok(())
    }

    fn print_result(&self, result: &DownloadResult) {
        if result.success {
            let title = result
                .video_info
                .as_ref()
                .map(|i| i.title.as_str())
                .unwrap_or(result.url.as_str());
            info!(
                "'{}': {} tracks, {} segments, {} files in {:.1}s",
                title,
                result.tracks.len(),
                result.total_segments,
                result.downloaded_files.len(),
                result.processing_time
            );
            for file in &result.downloaded_files {
                println!("{}", file.display());
            }
        } else {
            error!("Failed: {}", result.url);
        }
        for issue in &result.errors {
            warn!("{}: {}", result.url, issue);
        }
    }

    /// Show metadata and subtitle availability for a URL
    pub async fn info(&self, url: &str) -> Result<()> {
        let info = self.downloader.get_video_info(url).await?;

        println!("Title:      {}", info.title);
        println!("Platform:   {}", info.platform);
        println!("Uploader:   {}", info.uploader);
        println!("Duration:   {:.0}s", info.duration);
        println!("Views:      {}", info.view_count);
        println!("URL:        {}", info.webpage_url);

        if info.available_subtitle_languages.is_empty() {
            println!("Subtitles:  none");
        } else {
            println!(
                "Subtitles:  {}",
                info.available_subtitle_languages.join(", ")
            );
        }
        if !info.automatic_caption_languages.is_empty() {
            println!(
                "Auto captions: {}",
                info.automatic_caption_languages.join(", ")
            );
        }
        Ok(())
    }

    /// Print the supported output formats
    pub fn list_formats() {
        println!("{:<6} {:<24} parseable", "format", "mime type");
        for format in SubtitleFormat::all() {
            println!(
                "{:<6} {:<24} {}",
                format.extension(),
                format.mime_type(),
                if format.can_parse() { "yes" } else { "no" }
            );
        }
    }

    /// Print the supported language tags
    pub fn list_languages() {
        for (tag, name) in language_utils::SUPPORTED_LANGUAGES {
            println!("{:<8} {}", tag, name);
        }
    }
}
