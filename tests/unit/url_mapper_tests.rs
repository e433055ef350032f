/*!
 * Tests for the manifest and URL mapping
 */

use std::collections::HashSet;
use transmirror::app_config::SiteConfig;
use transmirror::localize::{url_to_filename, Manifest, UrlMapping};

use crate::common;

fn site() -> SiteConfig {
    SiteConfig::new(common::BASE_DOMAIN, common::ROOT_SEGMENT)
}

fn existing(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_manifestParse_shouldTrimAndSkipBlankLines() {
    let manifest = Manifest::parse("  https://example.org/book/a \n\n\t\nhttps://example.org/book/b\n");

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.urls()[0], "https://example.org/book/a");
    assert_eq!(manifest.urls()[1], "https://example.org/book/b");
}

#[test]
fn test_manifestParse_shouldSkipComments() {
    let manifest = Manifest::parse("# chapters\nhttps://example.org/book/a\n  # disabled\n");

    assert_eq!(manifest.urls(), ["https://example.org/book/a".to_string()]);
}

#[test]
fn test_manifestLoad_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();

    assert!(Manifest::load(temp_dir.path().join("urls.txt")).is_err());
}

#[test]
fn test_urlToFilename_withoutTrailingSlash_shouldUseLastSegment() {
    assert_eq!(url_to_filename("https://example.org/book/gpus", &site()), "gpus.html");
}

#[test]
fn test_build_shouldMapBothSlashForms() {
    let manifest = Manifest::parse("https://example.org/book/tpus\n");

    let mapping = UrlMapping::build(&manifest, &existing(&["tpus.html"]), &site());

    assert_eq!(mapping.get("https://example.org/book/tpus"), Some("tpus.html"));
    assert_eq!(mapping.get("https://example.org/book/tpus/"), Some("tpus.html"));
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_build_withRootFile_shouldMapBaseUrl() {
    let manifest = Manifest::parse("https://example.org/book/\n");

    let mapping = UrlMapping::build(&manifest, &existing(&["book.html"]), &site());

    assert_eq!(mapping.get("https://example.org/book"), Some("book.html"));
    assert_eq!(mapping.get("https://example.org/book/"), Some("book.html"));
    assert_eq!(mapping.source_url("book.html"), Some("https://example.org/book/"));
}

#[test]
fn test_build_withSharedFilename_shouldKeepFirstSourceUrl() {
    let manifest = Manifest::parse("https://example.org/book/a/intro\nhttps://example.org/book/b/intro\n");

    let mapping = UrlMapping::build(&manifest, &existing(&["intro.html"]), &site());

    assert_eq!(mapping.source_url("intro.html"), Some("https://example.org/book/a/intro"));
    assert_eq!(mapping.get("https://example.org/book/b/intro"), Some("intro.html"));
}

#[test]
fn test_resolve_withExtraTrailingSlashes_shouldFallBack() {
    let manifest = Manifest::parse("https://example.org/book/tpus\n");
    let mapping = UrlMapping::build(&manifest, &existing(&["tpus.html"]), &site());

    assert_eq!(mapping.resolve("https://example.org/book/tpus//"), Some("tpus.html"));
    assert_eq!(mapping.resolve("https://example.org/book/other"), None);
}

#[test]
fn test_fromDir_shouldUseFilesInOutputDir() {
    let temp_dir = common::create_temp_dir().unwrap();
    let out = temp_dir.path().join("trans");
    common::create_test_file(&out, "gpus.html", "<html></html>").unwrap();
    common::create_test_file(&out, "notes.txt", "not a page").unwrap();
    let manifest = common::create_test_file(
        temp_dir.path(),
        "urls.txt",
        "https://example.org/book/gpus\nhttps://example.org/book/tpus/\n",
    )
    .unwrap();

    let mapping = UrlMapping::from_dir(&manifest, &out, &site()).unwrap();

    assert_eq!(mapping.resolve("https://example.org/book/gpus/"), Some("gpus.html"));
    assert_eq!(mapping.resolve("https://example.org/book/tpus/"), None);
}

#[test]
fn test_fromDir_withMissingOutputDir_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let manifest = common::create_test_file(temp_dir.path(), "urls.txt", "https://example.org/book/a\n").unwrap();

    assert!(UrlMapping::from_dir(&manifest, temp_dir.path().join("missing"), &site()).is_err());
}
