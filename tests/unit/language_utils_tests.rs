/*!
 * Tests for language pair handling
 */

use khaya::language_utils::{LanguageCodeType, LanguagePair, get_language_name, validate_language_code};

#[test]
fn test_validateLanguageCode_withKnownCodes_shouldReturnType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("ee").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("dag").unwrap(), LanguageCodeType::Part3);
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("q1").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ee").unwrap(), "Ewe");
    assert!(get_language_name("xx").is_err());
}

#[test]
fn test_languagePair_roundTripThroughDisplay() {
    let pair: LanguagePair = "tw-en".parse().unwrap();

    assert_eq!(pair.source, "tw");
    assert_eq!(pair.target, "en");
    assert_eq!(pair.to_string().parse::<LanguagePair>().unwrap(), pair);
}

#[test]
fn test_languagePair_withThreeLetterTarget_shouldParse() {
    let pair: LanguagePair = "en-gaa".parse().unwrap();
    assert_eq!(pair.target, "gaa");
}
