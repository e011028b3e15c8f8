use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{resolve_language, url_host, ExtractionEngine, SubtitleExtractor};
use crate::errors::ExtractionError;
use crate::subtitle_model::{make_track, Segment, Track, TrackQuality, VideoInfo};

// @module: Bilibili adapter

const BILIBILI_HOSTS: [&str; 3] = ["bilibili.com", "b23.tv", "bilibili.tv"];

const VIEW_API: &str = "https://api.bilibili.com/x/web-interface/view";
const PLAYER_API: &str = "https://api.bilibili.com/x/player/v2";

static BVID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(BV[0-9A-Za-z]{10})").unwrap());
static AID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"av(\d+)").unwrap());

#[derive(Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct ViewData {
    aid: u64,
    cid: u64,
    title: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    pic: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    pubdate: i64,
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    stat: Stat,
}

#[derive(Deserialize, Default)]
struct Owner {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize, Default)]
struct Stat {
    #[serde(default)]
    view: u64,
}

#[derive(Deserialize)]
struct PlayerData {
    #[serde(default)]
    subtitle: SubtitleManifest,
}

#[derive(Deserialize, Default)]
struct SubtitleManifest {
    #[serde(default)]
    subtitles: Vec<ManifestEntry>,
}

#[derive(Deserialize, Clone)]
struct ManifestEntry {
    lan: String,
    #[serde(default)]
    lan_doc: String,
    subtitle_url: String,
    #[serde(default)]
    ai_status: i64,
}

impl ManifestEntry {
    fn is_auto(&self) -> bool {
        self.ai_status != 0 || self.lan.starts_with("ai-")
    }

    /// The manifest hands out scheme-relative URLs
    fn absolute_url(&self) -> String {
        if self.subtitle_url.starts_with("//") {
            format!("https:{}", self.subtitle_url)
        } else {
            self.subtitle_url.clone()
        }
    }
}

#[derive(Deserialize)]
struct SubtitleBody {
    #[serde(default)]
    body: Vec<SubtitleCue>,
}

#[derive(Deserialize)]
struct SubtitleCue {
    from: f64,
    to: f64,
    content: String,
}

pub struct BilibiliExtractor {
    engine: Arc<dyn ExtractionEngine>,
    http: reqwest::Client,
}

impl BilibiliExtractor {
    pub fn new(engine: Arc<dyn ExtractionEngine>, http: reqwest::Client) -> Self {
        Self { engine, http }
    }

    /// Pull a video id out of the URL; short links and odd URLs fall back
    /// to an engine probe
    async fn video_key(&self, url: &str) -> Result<(String, String), ExtractionError> {
        if let Some(caps) = BVID_RE.captures(url) {
            return Ok(("bvid".to_string(), caps[1].to_string()));
        }
        if let Some(caps) = AID_RE.captures(url) {
            return Ok(("aid".to_string(), caps[1].to_string()));
        }

        let raw = self.engine.probe(url).await?;
        if raw.id.is_empty() {
            return Err(ExtractionError::LookupFailed(format!(
                "could not determine video id for {}",
                url
            )));
        }
        if raw.id.starts_with("BV") {
            Ok(("bvid".to_string(), raw.id))
        } else {
            Ok(("aid".to_string(), raw.id))
        }
    }

    async fn fetch_view(&self, url: &str) -> Result<ViewData, ExtractionError> {
        let (key, id) = self.video_key(url).await?;
        let envelope: ApiEnvelope<ViewData> = self
            .http
            .get(VIEW_API)
            .query(&[(key.as_str(), id.as_str())])
            .send()
            .await
            .map_err(|e| ExtractionError::LookupFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| ExtractionError::LookupFailed(e.to_string()))?;

        if envelope.code != 0 {
            return Err(ExtractionError::LookupFailed(format!(
                "view API returned code {}: {}",
                envelope.code, envelope.message
            )));
        }
        envelope
            .data
            .ok_or_else(|| ExtractionError::LookupFailed("view API returned no data".to_string()))
    }

    async fn fetch_manifest(&self, view: &ViewData) -> Result<Vec<ManifestEntry>, ExtractionError> {
        let envelope: ApiEnvelope<PlayerData> = self
            .http
            .get(PLAYER_API)
            .query(&[("aid", view.aid), ("cid", view.cid)])
            .send()
            .await
            .map_err(|e| ExtractionError::LookupFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| ExtractionError::LookupFailed(e.to_string()))?;

        if envelope.code != 0 {
            return Err(ExtractionError::LookupFailed(format!(
                "player API returned code {}: {}",
                envelope.code, envelope.message
            )));
        }

        Ok(envelope.data.map(|d| d.subtitle.subtitles).unwrap_or_default())
    }

    async fn fetch_cues(&self, entry: &ManifestEntry) -> Result<Vec<Segment>, ExtractionError> {
        let body: SubtitleBody = self
            .http
            .get(entry.absolute_url())
            .send()
            .await
            .map_err(|e| ExtractionError::DownloadFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| ExtractionError::DownloadFailed(e.to_string()))?;

        Ok(body
            .body
            .into_iter()
            .filter(|cue| !cue.content.trim().is_empty())
            .map(|cue| Segment::new(cue.from, cue.to, cue.content))
            .collect())
    }

    fn track_from_entry(&self, entry: &ManifestEntry, segments: Vec<Segment>) -> Track {
        let is_auto = entry.is_auto();
        let quality = if is_auto {
            TrackQuality::Medium
        } else {
            TrackQuality::High
        };
        let source = if is_auto { "bilibili_auto" } else { "bilibili_manual" };
        let mut track = make_track(
            &entry.lan,
            is_auto,
            "json",
            Some(entry.absolute_url()),
            segments,
            quality,
            source,
        );
        if !entry.lan_doc.is_empty() {
            track.language_name = entry.lan_doc.clone();
        }
        track
    }
}

#[async_trait]
impl SubtitleExtractor for BilibiliExtractor {
    fn name(&self) -> &'static str {
        "bilibili"
    }

    fn can_handle(&self, url: &str) -> bool {
        match url_host(url) {
            Some(host) => BILIBILI_HOSTS.contains(&host.as_str()),
            None => false,
        }
    }

    async fn extract_video_info(&self, url: &str) -> Result<VideoInfo> {
        let view = self.fetch_view(url).await?;
        let manifest = self.fetch_manifest(&view).await.unwrap_or_default();

        let mut manual = Vec::new();
        let mut auto = Vec::new();
        for entry in &manifest {
            if entry.is_auto() {
                auto.push(entry.lan.clone());
            } else {
                manual.push(entry.lan.clone());
            }
        }

        let upload_date = DateTime::from_timestamp(view.pubdate, 0)
            .map(|dt| dt.format("%Y%m%d").to_string())
            .unwrap_or_default();

        Ok(VideoInfo {
            id: format!("av{}", view.aid),
            title: view.title,
            duration: view.duration,
            uploader: view.owner.name,
            upload_date,
            view_count: view.stat.view,
            description: view.desc,
            thumbnail: view.pic,
            webpage_url: url.to_string(),
            platform: self.name().to_string(),
            available_subtitle_languages: manual,
            automatic_caption_languages: auto,
        })
    }

    async fn extract_tracks(&self, url: &str, languages: &[String]) -> Result<Vec<Track>> {
        let view = self.fetch_view(url).await?;
        let manifest = self.fetch_manifest(&view).await?;
        info!(
            "Bilibili video '{}': {} subtitle entries",
            view.title,
            manifest.len()
        );

        let manual_tags: Vec<&String> = manifest
            .iter()
            .filter(|e| !e.is_auto())
            .map(|e| &e.lan)
            .collect();
        let auto_tags: Vec<&String> = manifest
            .iter()
            .filter(|e| e.is_auto())
            .map(|e| &e.lan)
            .collect();

        let mut tracks = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        let mut wanted: Vec<String> = languages.to_vec();

        loop {
            for requested in &wanted {
                let resolved = resolve_language(requested, &manual_tags)
                    .or_else(|| resolve_language(requested, &auto_tags));
                let tag = match resolved {
                    Some(tag) => tag,
                    None => {
                        debug!("Bilibili offers no subtitles for '{}'", requested);
                        continue;
                    }
                };

                if !taken.insert(tag.clone()) {
                    continue;
                }

                let entry = match manifest.iter().find(|e| e.lan == tag) {
                    Some(entry) => entry,
                    None => continue,
                };

                match self.fetch_cues(entry).await {
                    Ok(segments) if !segments.is_empty() => {
                        tracks.push(self.track_from_entry(entry, segments));
                    }
                    Ok(_) => debug!("Bilibili subtitle for '{}' is empty", tag),
                    Err(e) => warn!("Bilibili subtitle fetch failed for '{}': {}", tag, e),
                }
            }

            if tracks.is_empty() && !wanted.iter().any(|l| l == "en") {
                wanted = vec!["en".to_string()];
            } else {
                break;
            }
        }

        Ok(tracks)
    }
}
