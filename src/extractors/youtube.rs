use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use super::{
    collect_tracks, url_host, video_info_from_raw, ExtractionEngine, SubtitleExtractor,
    YOUTUBE_FORMAT_PRIORITY,
};
use crate::subtitle_model::{Track, VideoInfo};

// @module: YouTube adapter

const YOUTUBE_HOSTS: [&str; 4] = ["youtube.com", "m.youtube.com", "music.youtube.com", "youtu.be"];

pub struct YoutubeExtractor {
    engine: Arc<dyn ExtractionEngine>,
    http: reqwest::Client,
}

impl YoutubeExtractor {
    pub fn new(engine: Arc<dyn ExtractionEngine>, http: reqwest::Client) -> Self {
        Self { engine, http }
    }
}

#[async_trait]
impl SubtitleExtractor for YoutubeExtractor {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn can_handle(&self, url: &str) -> bool {
        match url_host(url) {
            Some(host) => YOUTUBE_HOSTS.contains(&host.as_str()),
            None => false,
        }
    }

    async fn extract_video_info(&self, url: &str) -> Result<VideoInfo> {
        let raw = self.engine.probe(url).await?;
        Ok(video_info_from_raw(&raw, self.name(), url))
    }

    async fn extract_tracks(&self, url: &str, languages: &[String]) -> Result<Vec<Track>> {
        let raw = self.engine.probe(url).await?;
        info!(
            "YouTube video '{}': {} manual subtitle languages, {} automatic",
            raw.title,
            raw.subtitles.len(),
            raw.automatic_captions.len()
        );

        let tracks = collect_tracks(
            &self.http,
            &raw,
            languages,
            &YOUTUBE_FORMAT_PRIORITY,
            usize::MAX,
            self.name(),
        )
        .await;

        Ok(tracks)
    }
}
