/*!
 * Tests for file utilities
 */

use std::fs;
use transmirror::file_utils::FileManager;

use crate::common;

#[test]
fn test_findFiles_shouldListMatchingFilesSortedAndNotRecurse() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.html", "b").unwrap();
    common::create_test_file(dir, "a.HTML", "a").unwrap();
    common::create_test_file(dir, "c.txt", "c").unwrap();
    common::create_test_file(&dir.join("nested"), "d.html", "d").unwrap();

    let files = FileManager::find_files(dir, ".html").unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.HTML", "b.html"]);
}

#[test]
fn test_findFiles_withMissingDir_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();

    assert!(FileManager::find_files(temp_dir.path().join("missing"), "html").is_err());
}

#[test]
fn test_listFileNames_shouldReturnBareNames() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "tpus.html", "x").unwrap();

    let names = FileManager::list_file_names(temp_dir.path(), "html").unwrap();

    assert!(names.contains("tpus.html"));
    assert_eq!(names.len(), 1);
}

#[test]
fn test_writeAtomic_shouldCreateParentsAndReplaceContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("out").join("page.html");

    FileManager::write_atomic(&path, "first").unwrap();
    FileManager::write_atomic(&path, "second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_existenceChecks_shouldDistinguishFilesAndDirs() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(temp_dir.path(), "f.txt", "x").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path()));
}

#[test]
fn test_readToString_withMissingFile_shouldMentionPath() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("missing.html");

    let error = FileManager::read_to_string(&path).unwrap_err();

    assert!(format!("{}", error).contains("missing.html"));
}
