use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::formats::SubtitleFormat;
use crate::language_utils;
use crate::transcribe::{self, AiCapabilities, PostProcessOptions};

/// Application configuration module
/// This module handles loading, validating and saving configuration
/// settings for downloads, AI fallback, translation and logging.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Preferred subtitle languages, in priority order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Output formats to write for every downloaded track
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// Directory subtitle files are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Output filename template
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Max concurrent downloads in batch mode
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// AI transcription settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// AI transcription configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AiConfig {
    // @field: Which AI capabilities are enabled
    #[serde(default)]
    pub capabilities: AiCapabilities,

    // @field: Whisper model name
    #[serde(default = "default_ai_model")]
    pub model: String,

    // @field: Max characters per subtitle after post-processing
    #[serde(default = "default_max_subtitle_length")]
    pub max_subtitle_length: usize,

    // @field: Min subtitle duration in seconds after post-processing
    #[serde(default = "default_min_subtitle_duration")]
    pub min_subtitle_duration: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            capabilities: AiCapabilities::default(),
            model: default_ai_model(),
            max_subtitle_length: default_max_subtitle_length(),
            min_subtitle_duration: default_min_subtitle_duration(),
        }
    }
}

impl AiConfig {
    // @returns: Post-processor options derived from this config
    pub fn post_process_options(&self) -> PostProcessOptions {
        PostProcessOptions {
            max_subtitle_length: self.max_subtitle_length,
            min_subtitle_duration: self.min_subtitle_duration,
        }
    }
}

/// Translation configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TranslationSettings {
    // @field: Whether finished tracks get translated
    #[serde(default)]
    pub enabled: bool,

    // @field: Target language tag
    #[serde(default)]
    pub target_language: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["zh-CN".to_string(), "en".to_string()]
}

fn default_formats() -> Vec<String> {
    vec!["srt".to_string(), "vtt".to_string()]
}

fn default_output_dir() -> String {
    "subtitles".to_string()
}

fn default_filename_template() -> String {
    "{title}_{language}.{format}".to_string()
}

fn default_concurrency() -> usize {
    3
}

fn default_ai_model() -> String {
    "base".to_string()
}

fn default_max_subtitle_length() -> usize {
    100
}

fn default_min_subtitle_duration() -> f64 {
    0.5
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(anyhow!("At least one subtitle language is required"));
        }
        for language in &self.languages {
            if !language_utils::is_supported_language(language) {
                return Err(anyhow!("Unsupported language code: {}", language));
            }
        }

        if self.formats.is_empty() {
            return Err(anyhow!("At least one output format is required"));
        }
        for format in &self.formats {
            SubtitleFormat::from_extension(format)
                .map_err(|_| anyhow!("Unsupported output format: {}", format))?;
        }

        if self.concurrency == 0 {
            return Err(anyhow!("Concurrency must be at least 1"));
        }

        if self.ai.capabilities.whisper && !transcribe::is_known_model(&self.ai.model) {
            return Err(anyhow!("Unknown whisper model: {}", self.ai.model));
        }

        if self.translation.enabled && self.translation.target_language.is_none() {
            return Err(anyhow!(
                "Translation is enabled but no target language is set"
            ));
        }

        Ok(())
    }

    /// Parse the configured output formats
    pub fn output_formats(&self) -> Result<Vec<SubtitleFormat>> {
        self.formats
            .iter()
            .map(|f| {
                SubtitleFormat::from_extension(f)
                    .map_err(|_| anyhow!("Unsupported output format: {}", f))
            })
            .collect()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            languages: default_languages(),
            formats: default_formats(),
            output_dir: default_output_dir(),
            filename_template: default_filename_template(),
            concurrency: default_concurrency(),
            ai: AiConfig::default(),
            translation: TranslationSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}
