/*!
 * Error types for the subgrab application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur during format conversion
#[derive(Error, Debug)]
pub enum FormatError {
    /// Error when a format name is not recognized
    #[error("Unsupported subtitle format: {0}")]
    Unsupported(String),

    /// Error when parsing a generate-only format
    #[error("Format not reversible: {0} can be generated but not parsed")]
    NotReversible(String),

    /// Error when there are no segments to convert
    #[error("No subtitle segments to convert")]
    EmptyTrack,
}

/// Errors that can occur during extraction from a platform
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Error when no adapter accepts the URL
    #[error("Unsupported platform for URL: {0}")]
    UnsupportedUrl(String),

    /// Error from the upstream extraction engine
    #[error("Extraction engine failed: {0}")]
    Upstream(String),

    /// Error when a subtitle blob download fails
    #[error("Failed to download subtitle content: {0}")]
    DownloadFailed(String),

    /// Error when a platform metadata lookup step fails
    #[error("Platform lookup failed: {0}")]
    LookupFailed(String),
}

/// Errors that can occur during AI transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error when the audio file is missing
    #[error("Audio file not found: {0}")]
    AudioNotFound(String),

    /// Error when no transcription capability is configured
    #[error("No transcription model available")]
    NoModelAvailable,

    /// Error from the transcription engine itself
    #[error("Transcription failed: {0}")]
    EngineFailed(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error when the translation service is not configured
    #[error("Translation service not available")]
    NotAvailable,

    /// Error when a translation batch fails
    #[error("Batch translation failed: {0}")]
    BatchFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from format conversion
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Error from extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
