/*!
 * Tests for language tag matching and naming
 */

use subgrab::language_utils::{
    base_code, display_name_or_tag, is_supported_language, language_display_name,
    language_matches, normalize_tag,
};

#[test]
fn test_baseCode_shouldStripRegion() {
    assert_eq!(base_code("zh-CN"), "zh");
    assert_eq!(base_code("en"), "en");
    assert_eq!(base_code("pt-BR"), "pt");
}

#[test]
fn test_normalizeTag_shouldLowercaseBaseAndUppercaseRegion() {
    assert_eq!(normalize_tag(" ZH-CN "), "zh-CN");
    assert_eq!(normalize_tag("EN"), "en");
    assert_eq!(normalize_tag("ja"), "ja");
}

/// Platforms hand out tags with every casing; all of them must hit the
/// same table entries
#[test]
fn test_normalizeTag_withLowercaseRegion_shouldCanonicalize() {
    assert_eq!(normalize_tag("zh-cn"), "zh-CN");
    assert_eq!(normalize_tag("en-us"), "en-US");
    assert_eq!(normalize_tag("zh-hans"), "zh-Hans");
    assert_eq!(normalize_tag("ZH-HANT"), "zh-Hant");
    assert_eq!(normalize_tag("es-419"), "es-419");
}

/// All Chinese-locale tags are interchangeable for matching
#[test]
fn test_languageMatches_withChineseVariants_shouldMatch() {
    assert!(language_matches("zh-CN", "zh"));
    assert!(language_matches("zh-CN", "zh-TW"));
    assert!(language_matches("zh-Hans", "zh-Hant"));
    assert!(language_matches("zh", "zh-CN"));
}

#[test]
fn test_languageMatches_withEnglishVariants_shouldMatch() {
    assert!(language_matches("en", "en-US"));
    assert!(language_matches("en-GB", "en-US"));
}

#[test]
fn test_languageMatches_withBaseCodeOnly_shouldMatch() {
    assert!(language_matches("pt-BR", "pt-PT"));
    assert!(language_matches("fr", "fr-CA"));
}

#[test]
fn test_languageMatches_withDifferentLanguages_shouldNotMatch() {
    assert!(!language_matches("en", "ja"));
    assert!(!language_matches("zh-CN", "ko"));
}

#[test]
fn test_isSupportedLanguage_shouldUseTable() {
    assert!(is_supported_language("zh-CN"));
    assert!(is_supported_language("en"));
    assert!(is_supported_language(" JA "));
    assert!(!is_supported_language("xx"));
}

#[test]
fn test_isSupportedLanguage_withLowercaseRegion_shouldStillMatch() {
    assert!(is_supported_language("zh-cn"));
    assert!(is_supported_language("EN-us"));
    assert!(is_supported_language("pt-br"));
}

#[test]
fn test_languageDisplayName_withTableAndIsoFallback_shouldResolve() {
    assert_eq!(language_display_name("zh-CN").unwrap(), "Chinese (Simplified)");
    assert_eq!(language_display_name("en").unwrap(), "English");
    // Not in the table, resolved through ISO 639-1
    assert_eq!(language_display_name("is").unwrap(), "Icelandic");
    assert!(language_display_name("zz").is_err());
}

#[test]
fn test_displayNameOrTag_withUnknownTag_shouldReturnTag() {
    assert_eq!(display_name_or_tag("zz-ZZ"), "zz-ZZ");
    assert_eq!(display_name_or_tag("ko"), "Korean");
}
