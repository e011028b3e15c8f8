use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::formats::SubtitleFormat;
use crate::subtitle_model::{Track, VideoInfo};

// @module: Output file naming and writing

const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_FILENAME_STEM: usize = 100;

/// Replace filesystem-hostile characters with underscores and cap length
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    cleaned.trim().chars().take(MAX_FILENAME_STEM).collect()
}

/// Render an output filename from a template.
///
/// Placeholders: `{title}`, `{language}`, `{language_name}`, `{format}`,
/// `{platform}`, `{uploader}`, `{id}`, `{quality}`, `{source}`. Each value
/// is sanitized before substitution.
pub fn render_filename(
    template: &str,
    video: &VideoInfo,
    track: &Track,
    format: SubtitleFormat,
) -> String {
    let rendered = template
        .replace("{title}", &sanitize_filename(&video.title))
        .replace("{language}", &sanitize_filename(&track.language))
        .replace("{language_name}", &sanitize_filename(&track.language_name))
        .replace("{format}", format.extension())
        .replace("{platform}", &sanitize_filename(&video.platform))
        .replace("{uploader}", &sanitize_filename(&video.uploader))
        .replace("{id}", &sanitize_filename(&video.id))
        .replace("{quality}", &track.quality.to_string())
        .replace("{source}", &sanitize_filename(&track.source));

    if rendered.trim().is_empty() {
        format!("subtitles.{}", format.extension())
    } else {
        rendered
    }
}

/// Create a directory and its parents if missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Write content atomically: write to a `.part` sibling, then rename.
///
/// A crash mid-write leaves only the partial sibling behind, never a
/// truncated destination file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    std::fs::write(&partial, content)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, path)
        .with_context(|| format!("Failed to move {} into place", partial.display()))?;

    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}
