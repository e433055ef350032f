/*!
 * Page translation through mock providers
 */

use std::fs;
use transmirror::app_config::Config;
use transmirror::html::decompose;
use transmirror::providers::mock::MockProvider;
use transmirror::translation::{BatchTranslator, DocumentTranslator, FileOutcome};
use transmirror::TranslationError;

use crate::common;

fn translator(provider: MockProvider) -> DocumentTranslator {
    DocumentTranslator::from_config(&Config::default(), Box::new(provider))
}

#[tokio::test]
async fn test_translateHtml_withEchoProvider_shouldOnlyChangeLang() {
    common::init_logging();
    let raw = common::sample_page("All About TPUs");
    let translator = translator(MockProvider::working());

    let document = translator.translate_html(&raw).await.unwrap();

    let expected = raw.replace(r#"lang="en""#, r#"lang="zh-CN""#);
    assert_eq!(document.html, expected.trim_end());
    assert_eq!(document.stats.placeholders, 1);
    assert_eq!(document.stats.restored, 1);
    assert_eq!(document.stats.placeholder_issues, 0);
    assert!(document.stats.metadata_translated);
}

#[tokio::test]
async fn test_translateHtml_shouldSendMathAsPlaceholder() {
    let mock = MockProvider::working();
    let translator = translator(mock.clone());

    translator.translate_html(&common::sample_page("T")).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].schema, "metadata");
    assert_eq!(requests[1].schema, "body");
    assert!(requests[1].source.contains("MATH_PLACEHOLDER_000"));
    assert!(!requests[1].source.contains("mjx-"));
    // Glossary reaches the prompt
    assert!(requests[1].prompt.contains("systolic array → 脉动阵列"));
}

#[tokio::test]
async fn test_translateHtml_withTranslatingProvider_shouldTranslateTextAndKeepMath() {
    let raw = common::sample_page("All About TPUs");
    let translator = translator(MockProvider::working().with_custom_response(common::fake_translate));

    let document = translator.translate_html(&raw).await.unwrap();
    let parts = decompose(&document.html);

    assert_eq!(parts.title, "关于 TPUs");
    assert_eq!(parts.description, "TPU 的工作原理 & why");
    assert!(document.html.contains("<p>A TPU is "));
    assert!(document.html.contains(&format!("{} 很快.</p>", common::MATH)));
    assert!(document.html.contains("<p>参见 <a"));
    assert!(document.html.contains(r#"document.write("</p>")"#));
}

#[tokio::test]
async fn test_translateHtml_withMetadataFailure_shouldKeepOriginalMetadata() {
    let raw = common::sample_page("All About TPUs");
    let translator = translator(MockProvider::fail_on("metadata").with_custom_response(common::fake_translate));

    let document = translator.translate_html(&raw).await.unwrap();
    let parts = decompose(&document.html);

    assert!(!document.stats.metadata_translated);
    assert_eq!(parts.title, "All About TPUs");
    assert_eq!(parts.description, "How TPUs work & why");
    assert!(document.html.contains("<h1>关于 TPUs</h1>"));
}

#[tokio::test]
async fn test_translateHtml_withBodyFailure_shouldFail() {
    let translator = translator(MockProvider::fail_on("body"));

    let result = translator.translate_html(&common::sample_page("T")).await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
}

#[tokio::test]
async fn test_translateHtml_withEmptyAnswer_shouldReportInvalidResult() {
    let translator = translator(MockProvider::empty());

    let result = translator.translate_html(&common::sample_page("T")).await;

    assert!(matches!(result, Err(TranslationError::InvalidResult(_))));
}

#[tokio::test]
async fn test_translateHtml_withPreambleBeforeBody_shouldKeepBody() {
    let raw = common::sample_page("All About TPUs");
    let translator = translator(
        MockProvider::working().with_custom_response(|s| format!("Here is the translation: {}", s)),
    );

    let document = translator.translate_html(&raw).await.unwrap();
    let parts = decompose(&document.html);

    assert!(!document.html.contains("Here is the translation: <body>"));
    assert!(parts.body.starts_with("<body>"));
    assert!(parts.body.contains(common::MATH));
    assert_eq!(document.stats.restored, 1);
}

#[tokio::test]
async fn test_translateFile_withAnswerWithoutMarkup_shouldFailWithoutWriting() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(&temp_dir.path().join("origin"), "tpus.html", &common::sample_page("T")).unwrap();
    let output_dir = temp_dir.path().join("trans");
    let translator = translator(MockProvider::working().with_custom_response(|_| "Sorry, I cannot help.".to_string()));

    let result = translator.translate_html(&common::sample_page("T")).await;
    assert!(matches!(result, Err(TranslationError::InvalidResult(_))));

    assert!(translator.translate_file(&input, &output_dir, false).await.is_err());
    assert!(!output_dir.join("tpus.html").exists());
}

#[tokio::test]
async fn test_translateFile_withBodyFailure_shouldNotWriteOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(&temp_dir.path().join("origin"), "tpus.html", &common::sample_page("T")).unwrap();
    let output_dir = temp_dir.path().join("trans");
    let translator = translator(MockProvider::failing());

    assert!(translator.translate_file(&input, &output_dir, false).await.is_err());
    assert!(!output_dir.join("tpus.html").exists());
}

#[tokio::test]
async fn test_translateFile_withExistingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(&temp_dir.path().join("origin"), "tpus.html", &common::sample_page("T")).unwrap();
    let output_dir = temp_dir.path().join("trans");
    let existing = common::create_test_file(&output_dir, "tpus.html", "old").unwrap();
    let mock = MockProvider::working();
    let translator = translator(mock.clone());

    let outcome = translator.translate_file(&input, &output_dir, false).await.unwrap();
    assert!(matches!(outcome, FileOutcome::Skipped { .. }));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "old");
    assert_eq!(mock.request_count(), 0);

    let outcome = translator.translate_file(&input, &output_dir, true).await.unwrap();
    assert!(matches!(outcome, FileOutcome::Translated { .. }));
    assert!(fs::read_to_string(&existing).unwrap().contains(r#"lang="zh-CN""#));
}

#[tokio::test]
async fn test_translateDirectory_withUnreadablePage_shouldContinue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let origin = temp_dir.path().join("origin");
    let output_dir = temp_dir.path().join("trans");
    common::create_test_file(&origin, "a.html", &common::sample_page("A")).unwrap();
    common::create_test_file(&origin, "c.html", &common::sample_page("C")).unwrap();
    fs::write(origin.join("b.html"), [0xff, 0xfe, 0xfd]).unwrap();
    common::create_test_file(&origin, "notes.txt", "ignored").unwrap();
    let translator = translator(MockProvider::working());

    let stats = BatchTranslator::new(&translator)
        .with_progress(false)
        .translate_directory(&origin, &output_dir, false)
        .await
        .unwrap();

    assert_eq!(stats.translated, 2);
    assert_eq!(stats.failed, 1);
    assert!(output_dir.join("a.html").exists());
    assert!(!output_dir.join("b.html").exists());
    assert!(output_dir.join("c.html").exists());

    let again = BatchTranslator::new(&translator)
        .with_progress(false)
        .translate_directory(&origin, &output_dir, false)
        .await
        .unwrap();
    assert_eq!(again.skipped, 2);
    assert_eq!(again.translated, 0);
}
