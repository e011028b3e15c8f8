/*!
 * Platform extraction adapters.
 *
 * Every supported platform gets an adapter implementing
 * [`SubtitleExtractor`]; the actual media probing is delegated to an
 * [`ExtractionEngine`] collaborator so adapters stay testable without
 * network access. Adapter selection walks a fixed priority list and the
 * first adapter whose `can_handle` accepts the URL wins.
 */

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::errors::ExtractionError;
use crate::formats::{self, SubtitleFormat};
use crate::language_utils;
use crate::subtitle_model::{make_track, Segment, Track, TrackQuality, VideoInfo};

pub mod bilibili;
pub mod engine;
pub mod generic;
pub mod youtube;

/// Format preference when several subtitle files are offered for one
/// language on YouTube
pub const YOUTUBE_FORMAT_PRIORITY: [&str; 5] = ["vtt", "srv3", "srv2", "srv1", "ttml"];

/// Format preference for platforms without a dedicated adapter
pub const GENERIC_FORMAT_PRIORITY: [&str; 8] =
    ["vtt", "srt", "ttml", "srv3", "srv2", "srv1", "ass", "ssa"];

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Version/17.1 Safari/605.1.15",
];

const DOWNLOAD_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_SECS: u64 = 2;

/// One downloadable subtitle file a platform offers for a language
#[derive(Debug, Clone)]
pub struct SubtitleOffer {
    pub url: String,
    pub ext: String,
}

/// Raw probe result from the extraction engine, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawMediaInfo {
    pub id: String,
    pub title: String,
    pub duration: f64,
    pub uploader: String,
    pub upload_date: String,
    pub view_count: u64,
    pub description: String,
    pub thumbnail: String,
    pub webpage_url: String,
    /// Manually authored subtitle offers, keyed by language tag
    pub subtitles: HashMap<String, Vec<SubtitleOffer>>,
    /// Automatically generated caption offers, keyed by language tag
    pub automatic_captions: HashMap<String, Vec<SubtitleOffer>>,
}

/// The probing/downloading collaborator adapters delegate to
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Probe a video URL for metadata and subtitle offers
    async fn probe(&self, url: &str) -> Result<RawMediaInfo, ExtractionError>;

    /// Download the audio stream of a video to `dest`
    async fn download_audio(&self, url: &str, dest: &Path) -> Result<(), ExtractionError>;
}

/// A platform adapter producing normalized video info and tracks
#[async_trait]
pub trait SubtitleExtractor: Send + Sync {
    /// Adapter name, also used as the platform tag in provenance strings
    fn name(&self) -> &'static str;

    /// Whether this adapter claims the URL
    fn can_handle(&self, url: &str) -> bool;

    /// Fetch normalized metadata for the video
    async fn extract_video_info(&self, url: &str) -> Result<VideoInfo>;

    /// Fetch subtitle tracks for the requested languages
    async fn extract_tracks(&self, url: &str, languages: &[String]) -> Result<Vec<Track>>;
}

/// Ordered adapter collection; selection is first `can_handle` in
/// priority order (youtube, bilibili, generic)
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn SubtitleExtractor>>,
}

impl ExtractorRegistry {
    pub fn new(engine: Arc<dyn ExtractionEngine>, http: reqwest::Client) -> Self {
        Self {
            extractors: vec![
                Box::new(youtube::YoutubeExtractor::new(engine.clone(), http.clone())),
                Box::new(bilibili::BilibiliExtractor::new(engine.clone(), http.clone())),
                Box::new(generic::GenericExtractor::new(engine, http)),
            ],
        }
    }

    /// Pick the adapter for a URL
    pub fn select(&self, url: &str) -> Result<&dyn SubtitleExtractor, ExtractionError> {
        self.extractors
            .iter()
            .find(|e| e.can_handle(url))
            .map(|e| e.as_ref())
            .ok_or_else(|| ExtractionError::UnsupportedUrl(url.to_string()))
    }
}

/// Host of a URL, lowercased, without a `www.` prefix
pub(crate) fn url_host(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}

/// Sort offers by a format priority list; unknown extensions rank last
pub(crate) fn rank_offers<'a>(
    offers: &'a [SubtitleOffer],
    priority: &[&str],
) -> Vec<&'a SubtitleOffer> {
    let mut ranked: Vec<&SubtitleOffer> = offers.iter().collect();
    ranked.sort_by_key(|offer| {
        priority
            .iter()
            .position(|p| *p == offer.ext.to_lowercase())
            .unwrap_or(priority.len())
    });
    ranked
}

/// Download a subtitle blob with a rotating User-Agent and exponential
/// backoff (three attempts)
pub(crate) async fn download_blob(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, ExtractionError> {
    let mut last_error = String::new();

    for attempt in 0..DOWNLOAD_ATTEMPTS {
        if attempt > 0 {
            let wait = BACKOFF_BASE_SECS * 2u64.pow(attempt - 1);
            debug!("Retrying subtitle download in {}s: {}", wait, url);
            tokio::time::sleep(Duration::from_secs(wait)).await;
        }

        let ua = USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())];
        let response = client
            .get(url)
            .header(reqwest::header::USER_AGENT, ua)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => return Ok(body),
                Err(e) => last_error = e.to_string(),
            },
            Ok(resp) => last_error = format!("HTTP {}", resp.status()),
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(ExtractionError::DownloadFailed(format!(
        "{}: {}",
        url, last_error
    )))
}

static SRV_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text start="([\d.]+)"(?:\s+dur="([\d.]+)")?[^>]*>(.*?)</text>"#).unwrap()
});

/// Parse YouTube's SRV timed-text XML (`<text start= dur=>`)
pub(crate) fn parse_srv(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for caps in SRV_TEXT.captures_iter(content) {
        let start: f64 = match caps[1].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let dur: f64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);

        let text = formats::xml::unescape(caps[3].trim());
        if text.is_empty() {
            continue;
        }

        segments.push(Segment::new(start, start + dur, text));
    }

    segments
}

/// Parse downloaded subtitle content according to its offer extension
pub(crate) fn parse_offer_content(ext: &str, content: &str) -> Vec<Segment> {
    let ext = ext.to_lowercase();
    if ext.starts_with("srv") || ext == "json3" {
        return parse_srv(content);
    }

    match SubtitleFormat::from_extension(&ext) {
        Ok(format) if format.can_parse() => {
            formats::parse(format, content).unwrap_or_default()
        }
        _ => {
            warn!("No parser for subtitle extension '{}'", ext);
            Vec::new()
        }
    }
}

/// Resolve a requested language tag against the tags a platform offers.
///
/// Exact match first, then the equivalence classes and base-code matching
/// from [`language_utils::language_matches`].
pub(crate) fn resolve_language(requested: &str, available: &[&String]) -> Option<String> {
    if let Some(exact) = available.iter().find(|tag| tag.as_str() == requested) {
        return Some(exact.to_string());
    }

    available
        .iter()
        .find(|tag| language_utils::language_matches(requested, tag))
        .map(|tag| tag.to_string())
}

/// Fetch and parse the best offer for one resolved language.
///
/// Offers are tried in priority order until one parses into at least one
/// segment; `max_offers` caps how many downloads are attempted.
async fn fetch_track(
    client: &reqwest::Client,
    tag: &str,
    offers: &[SubtitleOffer],
    priority: &[&str],
    max_offers: usize,
    is_auto: bool,
    platform: &str,
) -> Option<Track> {
    for offer in rank_offers(offers, priority).into_iter().take(max_offers) {
        let content = match download_blob(client, &offer.url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Subtitle download failed for {}: {}", tag, e);
                continue;
            }
        };

        let segments = parse_offer_content(&offer.ext, &content);
        if segments.is_empty() {
            debug!("Offer {} ({}) parsed to zero cues, trying next", offer.url, offer.ext);
            continue;
        }

        let quality = if is_auto {
            TrackQuality::Medium
        } else {
            TrackQuality::High
        };
        let source = format!(
            "{}_{}",
            platform,
            if is_auto { "auto" } else { "manual" }
        );

        return Some(make_track(
            tag,
            is_auto,
            &offer.ext.to_lowercase(),
            Some(offer.url.clone()),
            segments,
            quality,
            &source,
        ));
    }

    None
}

/// Resolve every requested language against a probe and download one track
/// per resolved language. Manual subtitles win over automatic captions;
/// when nothing resolves at all, English is tried as a last resort.
pub(crate) async fn collect_tracks(
    client: &reqwest::Client,
    raw: &RawMediaInfo,
    languages: &[String],
    priority: &[&str],
    max_offers: usize,
    platform: &str,
) -> Vec<Track> {
    let mut manual_tags: Vec<&String> = raw.subtitles.keys().collect();
    let mut auto_tags: Vec<&String> = raw.automatic_captions.keys().collect();
    manual_tags.sort();
    auto_tags.sort();

    let mut tracks: Vec<Track> = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    let mut wanted: Vec<String> = languages.to_vec();
    let fallback = "en".to_string();

    loop {
        for requested in &wanted {
            let resolved = resolve_language(requested, &manual_tags)
                .map(|tag| (tag, false))
                .or_else(|| resolve_language(requested, &auto_tags).map(|tag| (tag, true)));

            let (tag, is_auto) = match resolved {
                Some(hit) => hit,
                None => {
                    debug!("No subtitles offered for language '{}'", requested);
                    continue;
                }
            };

            if !taken.insert(tag.clone()) {
                continue;
            }

            let offers = if is_auto {
                &raw.automatic_captions[&tag]
            } else {
                &raw.subtitles[&tag]
            };

            if let Some(track) =
                fetch_track(client, &tag, offers, priority, max_offers, is_auto, platform).await
            {
                tracks.push(track);
            }
        }

        // Last resort: English, unless it was already requested
        if tracks.is_empty() && !wanted.contains(&fallback) {
            wanted = vec![fallback.clone()];
        } else {
            break;
        }
    }

    tracks
}

/// Build normalized video info from a raw probe
pub(crate) fn video_info_from_raw(raw: &RawMediaInfo, platform: &str, url: &str) -> VideoInfo {
    let mut manual: Vec<String> = raw.subtitles.keys().cloned().collect();
    let mut auto: Vec<String> = raw.automatic_captions.keys().cloned().collect();
    manual.sort();
    auto.sort();

    VideoInfo {
        id: raw.id.clone(),
        title: raw.title.clone(),
        duration: raw.duration,
        uploader: raw.uploader.clone(),
        upload_date: raw.upload_date.clone(),
        view_count: raw.view_count,
        description: raw.description.clone(),
        thumbnail: raw.thumbnail.clone(),
        webpage_url: if raw.webpage_url.is_empty() {
            url.to_string()
        } else {
            raw.webpage_url.clone()
        },
        platform: platform.to_string(),
        available_subtitle_languages: manual,
        automatic_caption_languages: auto,
    }
}
