use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for subtitle language tag handling
///
/// This module provides functions for normalizing, matching, and naming
/// the locale-style tags used by video platforms (e.g. "zh-CN", "en-US").
/// Matching falls back from exact tag to equivalence class to base code,
/// so a request for "zh-CN" resolves against a track tagged "zh".
/// Chinese-locale tags that are treated as interchangeable when matching
const CHINESE_VARIANTS: [&str; 5] = ["zh", "zh-CN", "zh-TW", "zh-Hans", "zh-Hant"];

/// English-locale tags that are treated as interchangeable when matching
const ENGLISH_VARIANTS: [&str; 3] = ["en", "en-US", "en-GB"];

/// Language tags accepted in requests, with display names
///
/// This is the static enumeration exposed to clients for validation
/// before a request is issued.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 76] = [
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
    ("zh-Hans", "Chinese (Simplified)"),
    ("zh-Hant", "Chinese (Traditional)"),
    ("zh", "Chinese"),
    ("en", "English"),
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("ru", "Russian"),
    ("pt", "Portuguese"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("es-419", "Spanish (Latin America)"),
    ("fr-CA", "French (Canada)"),
    ("it", "Italian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tr", "Turkish"),
    ("pl", "Polish"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
    ("no", "Norwegian"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("he", "Hebrew"),
    ("cs", "Czech"),
    ("hu", "Hungarian"),
    ("ro", "Romanian"),
    ("bg", "Bulgarian"),
    ("uk", "Ukrainian"),
    ("el", "Greek"),
    ("fa", "Persian"),
    ("ur", "Urdu"),
    ("bn", "Bengali"),
    ("ta", "Tamil"),
    ("my", "Burmese"),
    ("km", "Khmer"),
    ("ka", "Georgian"),
    ("sw", "Swahili"),
    ("sr", "Serbian"),
    ("hr", "Croatian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("et", "Estonian"),
    ("az", "Azerbaijani"),
    ("kk", "Kazakh"),
    ("uz", "Uzbek"),
    ("mn", "Mongolian"),
    ("ne", "Nepali"),
    ("si", "Sinhala"),
    ("lo", "Lao"),
    ("am", "Amharic"),
    ("af", "Afrikaans"),
    ("sq", "Albanian"),
    ("hy", "Armenian"),
    ("be", "Belarusian"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("gl", "Galician"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("pa", "Punjabi"),
];

/// Extract the base language code from a locale-style tag ("zh-CN" -> "zh")
pub fn base_code(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Normalize a tag for comparison: trimmed, base lowercased, region
/// canonicalized ("zh-cn" -> "zh-CN", "zh-hans" -> "zh-Hans")
pub fn normalize_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    match trimmed.split_once('-') {
        Some((base, region)) => {
            format!("{}-{}", base.to_lowercase(), canonical_region(region))
        }
        None => trimmed.to_lowercase(),
    }
}

/// Two-letter regions are uppercased and four-letter script subtags are
/// title-cased; anything else ("419") passes through unchanged
fn canonical_region(region: &str) -> String {
    if !region.chars().all(|c| c.is_ascii_alphabetic()) {
        return region.to_string();
    }
    match region.len() {
        2 => region.to_uppercase(),
        4 => {
            let mut chars = region.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        }
        _ => region.to_string(),
    }
}

/// Check if two language tags represent the same language for matching purposes
///
/// Exact match first, then equivalence class (all Chinese-locale tags are
/// interchangeable, likewise English), then base-language-code match.
pub fn language_matches(tag1: &str, tag2: &str) -> bool {
    let norm1 = normalize_tag(tag1);
    let norm2 = normalize_tag(tag2);

    if norm1 == norm2 {
        return true;
    }

    if CHINESE_VARIANTS.contains(&norm1.as_str()) && CHINESE_VARIANTS.contains(&norm2.as_str()) {
        return true;
    }

    if ENGLISH_VARIANTS.contains(&norm1.as_str()) && ENGLISH_VARIANTS.contains(&norm2.as_str()) {
        return true;
    }

    base_code(&norm1) == base_code(&norm2)
}

/// Check whether a tag is in the supported-language table
pub fn is_supported_language(tag: &str) -> bool {
    let normalized = normalize_tag(tag);
    SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == normalized)
}

/// Get the English display name for a language tag
///
/// Looks up the supported-language table first (it carries the regioned
/// variants isolang cannot resolve), then falls back to ISO 639-1 lookup.
pub fn language_display_name(tag: &str) -> Result<String> {
    let normalized = normalize_tag(tag);

    if let Some((_, name)) = SUPPORTED_LANGUAGES.iter().find(|(code, _)| *code == normalized) {
        return Ok(name.to_string());
    }

    let base = base_code(&normalized);
    if base.len() == 2 {
        if let Some(lang) = Language::from_639_1(base) {
            return Ok(lang.to_name().to_string());
        }
    } else if base.len() == 3 {
        if let Some(lang) = Language::from_639_3(base) {
            return Ok(lang.to_name().to_string());
        }
    }

    Err(anyhow!("Unknown language tag: {}", tag))
}

/// Get the display name for a tag, falling back to the tag itself
pub fn display_name_or_tag(tag: &str) -> String {
    language_display_name(tag).unwrap_or_else(|_| tag.to_string())
}
