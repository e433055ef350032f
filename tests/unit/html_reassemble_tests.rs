/*!
 * Tests for reassembly of translated documents
 */

use scraper::{Html, Selector};
use transmirror::html::reassemble::{
    clean_translated_body, force_lang, inject_description, inject_title, repair_prefix,
};
use transmirror::html::{decompose, shield, PlaceholderMap, Reassembler};

use crate::common;

#[test]
fn test_reassemble_withEchoedBody_shouldKeepMarkupAndForceLang() {
    let raw = common::sample_page("All About TPUs");
    let parts = decompose(&raw);
    let mut map = PlaceholderMap::new();
    let shielded = shield(&parts.body, &mut map);

    let result = Reassembler::new("zh-CN").reassemble(&parts, &shielded, &map, None, None);

    let expected = format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\" class=\"no-js\">\n{}\n{}\n</html>",
        parts.head, parts.body
    );
    assert_eq!(result.html, expected);
    assert!(result.restoration.is_complete());
}

#[test]
fn test_reassemble_withMetadata_shouldRoundTripThroughDecompose() {
    let raw = common::sample_page("All About TPUs");
    let parts = decompose(&raw);
    let map = PlaceholderMap::new();

    let result = Reassembler::new("zh-CN").reassemble(
        &parts,
        "<body><p>你好</p></body>",
        &map,
        Some("关于 TPU <全部>"),
        Some("说明 \"引号\" & 符号"),
    );
    let again = decompose(&result.html);

    assert_eq!(again.title, "关于 TPU <全部>");
    assert_eq!(again.description, "说明 \"引号\" & 符号");
    assert_eq!(again.root_attrs, r#" lang="zh-CN" class="no-js""#);
}

#[test]
fn test_reassemble_withEmptyMetadata_shouldKeepOriginalHead() {
    let raw = common::sample_page("Original");
    let parts = decompose(&raw);

    let map = PlaceholderMap::new();

    let result = Reassembler::new("ja").reassemble(&parts, "<body></body>", &map, Some(""), Some(""));

    assert!(result.html.contains(&parts.head));
}

#[test]
fn test_reassemble_outputShouldParseAsDocument() {
    let raw = common::sample_page("All About TPUs");
    let parts = decompose(&raw);
    let mut map = PlaceholderMap::new();
    let shielded = shield(&parts.body, &mut map);

    let result = Reassembler::new("zh-CN").reassemble(&parts, &shielded, &map, Some("标题"), None);
    let document = Html::parse_document(&result.html);

    let math = Selector::parse("p > mjx-container > mjx-math").unwrap();
    let html = Selector::parse("html[lang=\"zh-CN\"]").unwrap();
    assert_eq!(document.select(&math).count(), 1);
    assert_eq!(document.select(&html).count(), 1);
}

#[test]
fn test_injectTitle_withoutTitle_shouldCreateItAtHeadStart() {
    let head = r#"<head><meta charset="utf-8"></head>"#;

    assert_eq!(
        inject_title(head, "A & B"),
        r#"<head><title>A &amp; B</title><meta charset="utf-8"></head>"#
    );
}

#[test]
fn test_injectTitle_withTitle_shouldReplaceText() {
    let head = "<head><title>Old</title></head>";

    assert_eq!(inject_title(head, "New"), "<head><title>New</title></head>");
}

#[test]
fn test_injectDescription_withExistingMeta_shouldReplaceContentOnly() {
    let head = r#"<head><meta name="description" content="old" data-x="1"></head>"#;

    assert_eq!(
        inject_description(head, "new \"one\""),
        r#"<head><meta name="description" content="new &quot;one&quot;" data-x="1"></head>"#
    );
}

#[test]
fn test_injectDescription_withoutMeta_shouldAppendToHead() {
    let head = "<head><title>T</title></head>";

    assert_eq!(
        inject_description(head, "d"),
        r#"<head><title>T</title><meta name="description" content="d"></head>"#
    );
}

#[test]
fn test_forceLang_shouldReplaceOrAddLang() {
    assert_eq!(force_lang(r#" lang="en" class="x""#, "zh-CN"), r#" lang="zh-CN" class="x""#);
    assert_eq!(force_lang(r#" class="x""#, "zh-CN"), r#" class="x" lang="zh-CN""#);
    assert_eq!(force_lang("", "zh-CN"), r#" lang="zh-CN""#);
}

#[test]
fn test_cleanTranslatedBody_shouldStripFenceAndStrayLine() {
    let raw = "```html\n<body><p>x</p></body>\n```";
    assert_eq!(clean_translated_body(raw), "<body><p>x</p></body>");

    let raw = "Here is the translation:\n<body><p>x</p></body>";
    assert_eq!(clean_translated_body(raw), "<body><p>x</p></body>");
}

#[test]
fn test_cleanTranslatedBody_withPreambleOnSameLine_shouldKeepMarkup() {
    let raw = "Here is the translation: <body><p>你好</p></body>";

    assert_eq!(clean_translated_body(raw), "<body><p>你好</p></body>");
}

#[test]
fn test_cleanTranslatedBody_withoutMarkup_shouldReturnEmpty() {
    assert_eq!(clean_translated_body("Sorry, I cannot translate this."), "");
}

#[test]
fn test_repairPrefix_withPreambleBeforeDoctype_shouldKeepDocument() {
    let repaired = repair_prefix("Sure! <!DOCTYPE html>\n<html>\n</html>");

    assert_eq!(repaired, "<!DOCTYPE html>\n<html>\n</html>");
}

#[test]
fn test_repairPrefix_withMissingDoctype_shouldInsertIt() {
    let repaired = repair_prefix("Sure!\n<html lang=\"zh-CN\">\n</html>");

    assert_eq!(repaired, "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n</html>");
}

#[test]
fn test_repairPrefix_withDoctype_shouldNotChange() {
    let html = "<!DOCTYPE html>\n<html>\n</html>";

    assert_eq!(repair_prefix(html), html);
}
