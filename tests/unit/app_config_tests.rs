/*!
 * Tests for configuration defaults, parsing and validation
 */

use subgrab::app_config::{AiConfig, Config, LogLevel, TranslationSettings};
use subgrab::formats::SubtitleFormat;
use subgrab::transcribe::AiCapabilities;

#[test]
fn test_defaultConfig_shouldCarryDocumentedDefaults() {
    let config = Config::default();
    assert_eq!(config.languages, vec!["zh-CN", "en"]);
    assert_eq!(config.formats, vec!["srt", "vtt"]);
    assert_eq!(config.output_dir, "subtitles");
    assert_eq!(config.filename_template, "{title}_{language}.{format}");
    assert_eq!(config.concurrency, 3);
    assert_eq!(config.ai.model, "base");
    assert_eq!(config.ai.max_subtitle_length, 100);
    assert_eq!(config.ai.min_subtitle_duration, 0.5);
    assert!(!config.translation.enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_defaultConfig_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_configFromJson_withEmptyObject_shouldFillDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.languages, vec!["zh-CN", "en"]);
    assert_eq!(config.concurrency, 3);
    assert!(!config.ai.capabilities.whisper);
}

#[test]
fn test_configFromJson_withPartialObject_shouldKeepOtherDefaults() {
    let config: Config = serde_json::from_str(
        r#"{"languages": ["ja"], "ai": {"model": "small"}}"#,
    )
    .unwrap();
    assert_eq!(config.languages, vec!["ja"]);
    assert_eq!(config.ai.model, "small");
    assert_eq!(config.ai.max_subtitle_length, 100);
    assert_eq!(config.formats, vec!["srt", "vtt"]);
}

#[test]
fn test_validate_withEmptyLanguages_shouldFail() {
    let config = Config {
        languages: vec![],
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnsupportedLanguage_shouldFail() {
    let config = Config {
        languages: vec!["xx".to_string()],
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownFormat_shouldFail() {
    let config = Config {
        formats: vec!["mkv".to_string()],
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let config = Config {
        concurrency: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownWhisperModel_shouldFailOnlyWhenEnabled() {
    let mut config = Config {
        ai: AiConfig {
            model: "gigantic".to_string(),
            ..AiConfig::default()
        },
        ..Config::default()
    };
    // Whisper disabled: the model name is not checked
    assert!(config.validate().is_ok());

    config.ai.capabilities = AiCapabilities {
        whisper: true,
        ..AiCapabilities::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withTranslationEnabledButNoTarget_shouldFail() {
    let config = Config {
        translation: TranslationSettings {
            enabled: true,
            target_language: None,
        },
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        translation: TranslationSettings {
            enabled: true,
            target_language: Some("en".to_string()),
        },
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_outputFormats_shouldParseConfiguredExtensions() {
    let config = Config {
        formats: vec!["srt".to_string(), "json".to_string()],
        ..Config::default()
    };
    assert_eq!(
        config.output_formats().unwrap(),
        vec![SubtitleFormat::Srt, SubtitleFormat::Json]
    );
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Debug), log::LevelFilter::Debug);
    assert_eq!(log::LevelFilter::from(&LogLevel::Error), log::LevelFilter::Error);
}

#[test]
fn test_aiConfig_postProcessOptions_shouldCarryLimits() {
    let ai = AiConfig {
        max_subtitle_length: 80,
        min_subtitle_duration: 1.0,
        ..AiConfig::default()
    };
    let options = ai.post_process_options();
    assert_eq!(options.max_subtitle_length, 80);
    assert_eq!(options.min_subtitle_duration, 1.0);
}
