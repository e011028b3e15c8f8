// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::Path;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod downloader;
mod errors;
mod extractors;
mod file_utils;
mod formats;
mod language_utils;
mod subtitle_model;
mod transcribe;
mod translation;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download subtitles for one or more video URLs
    Download(DownloadArgs),

    /// Show video metadata and subtitle availability
    Info {
        /// Video URL
        url: String,
    },

    /// List supported output formats
    Formats,

    /// List supported language codes
    Languages,
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    /// Video URLs to process
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Preferred subtitle languages, in priority order
    #[arg(short, long = "language", value_name = "LANG")]
    languages: Vec<String>,

    /// Output formats to write
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<String>,

    /// Transcribe the audio with AI when no subtitles exist
    #[arg(long)]
    ai_fallback: bool,

    /// Whisper model for the AI fallback
    #[arg(long, value_name = "MODEL")]
    ai_model: Option<String>,

    /// Translate finished tracks into this language
    #[arg(long, value_name = "LANG")]
    translate_to: Option<String>,

    /// Directory subtitle files are written into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Output filename template
    #[arg(long, value_name = "TEMPLATE")]
    template: Option<String>,

    /// Max concurrent downloads in batch mode
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
}

/// subgrab - universal subtitle downloader and converter
///
/// Downloads subtitles from video platforms, falls back to AI
/// transcription when none exist, and converts them between ten
/// subtitle formats.
#[derive(Parser, Debug)]
#[command(name = "subgrab")]
#[command(version = "1.0.0")]
#[command(about = "Download and convert video subtitles")]
#[command(long_about = "subgrab downloads subtitles from video platforms (YouTube, Bilibili,
and anything yt-dlp understands), normalizes them, and writes them in any
of ten subtitle formats.

EXAMPLES:
    subgrab download https://youtu.be/VIDEO              # default languages/formats
    subgrab download -l en -l ja -f srt -f ass URL       # pick languages and formats
    subgrab download --ai-fallback --ai-model small URL  # transcribe when no subtitles
    subgrab info https://youtu.be/VIDEO                  # show subtitle availability
    subgrab formats                                      # list output formats

CONFIGURATION:
    Settings are stored in conf.json by default. If the config file does
    not exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let config_level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&config_level).into());
    }

    match cli.command {
        Commands::Formats => {
            Controller::list_formats();
            Ok(())
        }
        Commands::Languages => {
            Controller::list_languages();
            Ok(())
        }
        Commands::Info { url } => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller.info(&url).await
        }
        Commands::Download(args) => {
            let mut config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            apply_download_args(&mut config, &args);
            let controller = Controller::with_config(config)?;
            controller.download(args.urls).await
        }
    }
}

/// Load the configuration file, creating a default one when missing
fn load_config(config_path: &str, cli_level: Option<&CliLogLevel>) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config file: {}", config_path))?;
        serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to: {}", config_path))?;
        config
    };

    // CLI log level wins; otherwise follow the config
    if cli_level.is_none() {
        log::set_max_level((&config.log_level).into());
    }

    Ok(config)
}

/// Override config values with command-line options where provided
fn apply_download_args(config: &mut Config, args: &DownloadArgs) {
    if !args.languages.is_empty() {
        config.languages = args.languages.clone();
    }
    if !args.formats.is_empty() {
        config.formats = args.formats.clone();
    }
    if args.ai_fallback {
        config.ai.capabilities.whisper = true;
    }
    if let Some(model) = &args.ai_model {
        config.ai.model = model.clone();
    }
    if let Some(target) = &args.translate_to {
        config.translation.enabled = true;
        config.translation.target_language = Some(target.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(template) = &args.template {
        config.filename_template = template.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
}
