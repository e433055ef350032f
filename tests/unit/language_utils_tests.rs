/*!
 * Tests for language utilities
 */

use transmirror::language_utils::{get_language_name, language_codes_match, normalize_to_part2t, primary_subtag};

#[test]
fn test_primarySubtag_shouldDropRegion() {
    assert_eq!(primary_subtag("zh-CN"), "zh");
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag(" EN "), "en");
}

#[test]
fn test_normalizeToPart2t_withKnownCodes_shouldReturnThreeLetters() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("zh-CN").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("deu").unwrap(), "deu");
}

#[test]
fn test_normalizeToPart2t_withUnknownCode_shouldFail() {
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("").is_err());
}

#[test]
fn test_languageCodesMatch_shouldCompareLanguages() {
    assert!(language_codes_match("zh-CN", "zho"));
    assert!(language_codes_match("ger", "de"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("zh-CN").unwrap(), "Chinese");
}
