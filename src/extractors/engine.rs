use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use tokio::process::Command;

use super::{ExtractionEngine, RawMediaInfo, SubtitleOffer};
use crate::errors::ExtractionError;

// @module: yt-dlp subprocess engine

const PROBE_TIMEOUT: Duration = Duration::from_secs(60);
const AUDIO_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Deserialize)]
struct ProbeJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    uploader: String,
    #[serde(default)]
    upload_date: String,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    webpage_url: String,
    #[serde(default)]
    subtitles: HashMap<String, Vec<ProbeOffer>>,
    #[serde(default)]
    automatic_captions: HashMap<String, Vec<ProbeOffer>>,
}

#[derive(Deserialize)]
struct ProbeOffer {
    #[serde(default)]
    url: String,
    #[serde(default)]
    ext: String,
}

fn convert_offers(offers: HashMap<String, Vec<ProbeOffer>>) -> HashMap<String, Vec<SubtitleOffer>> {
    offers
        .into_iter()
        .map(|(lang, list)| {
            let converted = list
                .into_iter()
                .filter(|o| !o.url.is_empty())
                .map(|o| SubtitleOffer { url: o.url, ext: o.ext })
                .collect();
            (lang, converted)
        })
        .collect()
}

/// Extraction engine shelling out to the `yt-dlp` binary.
///
/// Probing runs `yt-dlp -J` and maps its JSON dump; audio download uses
/// the bestaudio format selection. Both run under a timeout so a stuck
/// subprocess cannot hang the pipeline.
pub struct YtDlpEngine {
    binary: String,
}

impl YtDlpEngine {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for YtDlpEngine {
    async fn probe(&self, url: &str) -> Result<RawMediaInfo, ExtractionError> {
        debug!("Probing {} with {}", url, self.binary);
        let run = Command::new(&self.binary)
            .args(["-J", "--no-warnings", "--skip-download", url])
            .output();

        let output = tokio::time::timeout(PROBE_TIMEOUT, run)
            .await
            .map_err(|_| ExtractionError::Upstream("probe timed out".to_string()))?
            .map_err(|e| ExtractionError::Upstream(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Upstream(stderr.trim().to_string()));
        }

        let probe: ProbeJson = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractionError::Upstream(format!("bad probe JSON: {}", e)))?;

        Ok(RawMediaInfo {
            id: probe.id,
            title: probe.title,
            duration: probe.duration,
            uploader: probe.uploader,
            upload_date: probe.upload_date,
            view_count: probe.view_count,
            description: probe.description,
            thumbnail: probe.thumbnail,
            webpage_url: probe.webpage_url,
            subtitles: convert_offers(probe.subtitles),
            automatic_captions: convert_offers(probe.automatic_captions),
        })
    }

    async fn download_audio(&self, url: &str, dest: &Path) -> Result<(), ExtractionError> {
        debug!("Downloading audio for {} to {}", url, dest.display());
        let run = Command::new(&self.binary)
            .args([
                "-f",
                "bestaudio",
                "--no-warnings",
                "-o",
                dest.to_str().unwrap_or_default(),
                "--force-overwrites",
                url,
            ])
            .output();

        let output = tokio::time::timeout(AUDIO_TIMEOUT, run)
            .await
            .map_err(|_| ExtractionError::Upstream("audio download timed out".to_string()))?
            .map_err(|e| ExtractionError::Upstream(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::DownloadFailed(stderr.trim().to_string()));
        }

        Ok(())
    }
}
