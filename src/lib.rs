/*!
 * # subgrab - universal subtitle downloader and converter
 *
 * A Rust library for downloading video subtitles from any platform and
 * converting them between subtitle formats.
 *
 * ## Features
 *
 * - Download manual subtitles and automatic captions from YouTube,
 *   Bilibili, and any platform yt-dlp understands
 * - Fall back to AI speech-to-text transcription when a video has no
 *   subtitles at all
 * - Convert between ten subtitle formats (SRT, VTT, ASS, SSA, TXT, JSON,
 *   CSV, XML, TTML, DFXP)
 * - Post-process machine transcripts into readable subtitles
 * - Translate finished tracks with a pluggable translation service
 * - Batch downloads with bounded concurrency
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_model`: The canonical segment/track/video data model
 * - `formats`: Format codecs and the conversion registry
 * - `extractors`: Platform adapters and the extraction engine seam
 * - `transcribe`: AI transcription trait, post-processing, whisper engine
 * - `translation`: Translation trait and track translation
 * - `downloader`: The download orchestrator and batch pipeline
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `language_utils`: Language tag matching and naming
 * - `file_utils`: Output naming and atomic writes
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

pub mod app_config;
pub mod app_controller;
pub mod downloader;
pub mod errors;
pub mod extractors;
pub mod file_utils;
pub mod formats;
pub mod language_utils;
pub mod subtitle_model;
pub mod transcribe;
pub mod translation;

// Re-export commonly used types
pub use app_config::Config;
pub use downloader::{DownloadRequest, DownloadResult, Downloader};
pub use errors::{AppError, ExtractionError, FormatError, TranscriptionError, TranslationError};
pub use formats::SubtitleFormat;
pub use subtitle_model::{Segment, Track, TrackQuality, VideoInfo};
