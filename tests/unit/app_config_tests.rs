/*!
 * Tests for app configuration
 */

use transmirror::app_config::{Config, LogLevel, ProvenanceConfig, SiteConfig, TranslationProvider};

use crate::common;

#[test]
fn test_config_default_shouldTargetSimplifiedChinese() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh-CN");
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.site.root_filename(), "scaling-book.html");
    assert!(config.translation.terminology.contains_key("systolic array"));
}

#[test]
fn test_siteConfig_shouldNormalizeBaseAndRootFile() {
    let site = SiteConfig::new("https://example.org/book/", "book");
    assert_eq!(site.base(), "https://example.org/book");
    assert_eq!(site.root_filename(), "book.html");

    let custom = SiteConfig {
        root_filename: Some("index.html".to_string()),
        ..site
    };
    assert_eq!(custom.root_filename(), "index.html");

    assert_eq!(SiteConfig::new("https://example.org", "").root_filename(), "index.html");
}

#[test]
fn test_config_saveAndLoad_shouldPreserveValues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    let mut config = common::test_config(temp_dir.path());
    config.translation.provider = TranslationProvider::Ollama;
    config.provenance = ProvenanceConfig {
        translator_name: "Jane Doe".to_string(),
        ..ProvenanceConfig::default()
    };

    config.save(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);
    assert_eq!(loaded.paths.output_dir, config.paths.output_dir);
    assert_eq!(loaded.site.base_domain, common::BASE_DOMAIN);
    assert_eq!(loaded.provenance.translator_name, "Jane Doe");
    assert_eq!(loaded.translation.common.retry_backoff_ms, 1);
}

#[test]
fn test_config_fromFile_withMinimalJson_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"source_language": "en", "target_language": "ja"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.available_providers.len(), 2);
    assert_eq!(config.translation.common.retry_count, 3);
}

#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ nope").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_validate_withOllama_shouldAcceptDefaults() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;

    let mut bad_language = config.clone();
    bad_language.target_language = "xx-YY".to_string();
    assert!(bad_language.validate().is_err());

    let mut bad_site = config.clone();
    bad_site.site.base_domain = "ftp://example.org".to_string();
    assert!(bad_site.validate().is_err());
}

#[test]
fn test_translationConfig_shouldPreferConfiguredValues() {
    let mut config = Config::default();
    config.translation.available_providers[0].api_key = "key".to_string();
    config.translation.available_providers[0].model = "gemini-test".to_string();

    assert_eq!(config.translation.get_api_key(), "key");
    assert_eq!(config.translation.get_model(), "gemini-test");
    assert_eq!(config.translation.get_timeout_secs(), 2400);

    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_api_key(), "");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_translationProvider_shouldParseCaseInsensitively() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert_eq!("OLLAMA".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("deepl".parse::<TranslationProvider>().is_err());
}
