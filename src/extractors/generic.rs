use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use super::{
    collect_tracks, url_host, video_info_from_raw, ExtractionEngine, SubtitleExtractor,
    GENERIC_FORMAT_PRIORITY,
};
use crate::subtitle_model::{Track, VideoInfo};

// @module: Catch-all adapter for platforms without a dedicated one

// How many ranked offers to download per language before giving up
const MAX_OFFER_TRIES: usize = 3;

const KNOWN_PLATFORMS: [(&str, &str); 9] = [
    ("vimeo.com", "vimeo"),
    ("dailymotion.com", "dailymotion"),
    ("twitch.tv", "twitch"),
    ("twitter.com", "twitter"),
    ("x.com", "twitter"),
    ("facebook.com", "facebook"),
    ("instagram.com", "instagram"),
    ("tiktok.com", "tiktok"),
    ("nicovideo.jp", "niconico"),
];

pub struct GenericExtractor {
    engine: Arc<dyn ExtractionEngine>,
    http: reqwest::Client,
}

impl GenericExtractor {
    pub fn new(engine: Arc<dyn ExtractionEngine>, http: reqwest::Client) -> Self {
        Self { engine, http }
    }

    /// Friendly platform name from the host, falling back to "generic"
    fn platform_for(&self, url: &str) -> &'static str {
        let host = match url_host(url) {
            Some(host) => host,
            None => return "generic",
        };

        KNOWN_PLATFORMS
            .iter()
            .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{}", domain)))
            .map(|(_, name)| *name)
            .unwrap_or("generic")
    }
}

#[async_trait]
impl SubtitleExtractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    async fn extract_video_info(&self, url: &str) -> Result<VideoInfo> {
        let raw = self.engine.probe(url).await?;
        Ok(video_info_from_raw(&raw, self.platform_for(url), url))
    }

    async fn extract_tracks(&self, url: &str, languages: &[String]) -> Result<Vec<Track>> {
        let platform = self.platform_for(url);
        let raw = self.engine.probe(url).await?;
        info!(
            "{} video '{}': {} manual subtitle languages, {} automatic",
            platform,
            raw.title,
            raw.subtitles.len(),
            raw.automatic_captions.len()
        );

        let tracks = collect_tracks(
            &self.http,
            &raw,
            languages,
            &GENERIC_FORMAT_PRIORITY,
            MAX_OFFER_TRIES,
            platform,
        )
        .await;

        Ok(tracks)
    }
}
