/*!
 * Track translation.
 *
 * Translation is a collaborator behind the [`Translator`] trait; this
 * module owns the batching, retry, and track-rebuilding logic around it.
 * A translated track is a new track, never a mutation of the source.
 */

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::TranslationError;
use crate::language_utils;
use crate::subtitle_model::{Segment, Track};

/// How many segment texts are sent to the service per call
const BATCH_SIZE: usize = 10;

/// Confidence penalty applied to machine-translated segments
const TRANSLATION_CONFIDENCE_FACTOR: f64 = 0.9;

/// A text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a batch of strings into `target_language`, returning one
    /// output string per input in the same order
    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError>;
}

/// Translate every segment of a track into `target_language`.
///
/// Texts go out in batches; a batch whose reply has the wrong row count is
/// retried one string at a time before the whole operation fails. The
/// result is a new track with `source = "translated_from_<lang>"` and each
/// segment's confidence scaled down.
pub async fn translate_track(
    translator: &dyn Translator,
    track: &Track,
    target_language: &str,
) -> Result<Track, TranslationError> {
    if language_utils::language_matches(&track.language, target_language) {
        debug!(
            "Track already in target language '{}', skipping translation",
            target_language
        );
        return Ok(track.clone());
    }

    let texts: Vec<String> = track.segments.iter().map(|s| s.text.clone()).collect();
    let mut translated: Vec<String> = Vec::with_capacity(texts.len());

    for batch in texts.chunks(BATCH_SIZE) {
        let reply = translator.translate_batch(batch, target_language).await?;

        if reply.len() == batch.len() {
            translated.extend(reply);
            continue;
        }

        // Row-count mismatch: fall back to one string per call so a single
        // misbehaving reply cannot shift every following segment
        warn!(
            "Translation batch returned {} rows for {} inputs, retrying individually",
            reply.len(),
            batch.len()
        );
        for text in batch {
            let single = translator
                .translate_batch(std::slice::from_ref(text), target_language)
                .await?;
            match single.into_iter().next() {
                Some(row) => translated.push(row),
                None => {
                    return Err(TranslationError::BatchFailed(
                        "empty reply for single-string retry".to_string(),
                    ));
                }
            }
        }
    }

    let segments: Vec<Segment> = track
        .segments
        .iter()
        .zip(translated)
        .map(|(segment, text)| {
            Segment::with_details(
                segment.start_time,
                segment.end_time,
                text,
                segment.confidence * TRANSLATION_CONFIDENCE_FACTOR,
                Some(target_language.to_string()),
            )
        })
        .collect();

    Ok(Track {
        language: target_language.to_string(),
        language_name: language_utils::display_name_or_tag(target_language),
        is_auto_generated: track.is_auto_generated,
        source_format: track.source_format.clone(),
        source_url: track.source_url.clone(),
        segments,
        quality: track.quality,
        source: format!("translated_from_{}", track.language),
    })
}
