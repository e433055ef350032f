/*!
 * Tests for document decomposition
 */

use transmirror::html::decompose;
use transmirror::html::decompose::{EMPTY_BODY, EMPTY_HEAD};

use crate::common;

#[test]
fn test_decompose_withCompletePage_shouldSplitParts() {
    let raw = common::sample_page("All About TPUs");
    let parts = decompose(&raw);

    assert_eq!(parts.doctype, "<!DOCTYPE html>");
    assert_eq!(parts.root_attrs, r#" lang="en" class="no-js""#);
    assert!(parts.head.starts_with("<head>"));
    assert!(parts.head.ends_with("</head>"));
    assert!(parts.body.starts_with("<body>"));
    assert!(parts.body.ends_with("</body>"));
    assert_eq!(parts.title, "All About TPUs");
    assert_eq!(parts.description, "How TPUs work & why");
}

#[test]
fn test_decompose_shouldKeepBodyBytes() {
    let raw = common::sample_page("T");
    let parts = decompose(&raw);

    assert!(raw.contains(&parts.body));
    assert!(parts.body.contains(common::MATH));
    assert!(parts.body.contains(r#"document.write("</p>")"#));
}

#[test]
fn test_decompose_withoutDoctypeOrHead_shouldUseDefaults() {
    let parts = decompose("<html><body><p>x</p></body></html>");

    assert_eq!(parts.doctype, "<!DOCTYPE html>");
    assert_eq!(parts.root_attrs, "");
    assert_eq!(parts.head, EMPTY_HEAD);
    assert_eq!(parts.body, "<body><p>x</p></body>");
    assert_eq!(parts.title, "");
    assert_eq!(parts.description, "");
}

#[test]
fn test_decompose_withFragment_shouldNotFail() {
    let parts = decompose("just some text");

    assert_eq!(parts.head, EMPTY_HEAD);
    assert_eq!(parts.body, EMPTY_BODY);
}

#[test]
fn test_decompose_withUnclosedBody_shouldRunToHtmlEnd() {
    let parts = decompose("<!doctype html><html><head></head><body><p>x</p></html>");

    assert_eq!(parts.doctype, "<!doctype html>");
    assert_eq!(parts.body, "<body><p>x</p>");
}

#[test]
fn test_decompose_withEntityInTitle_shouldDecodeText() {
    let parts = decompose("<html><head><title>A &amp; B</title></head><body></body></html>");

    assert_eq!(parts.title, "A & B");
}
