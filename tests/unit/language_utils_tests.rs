/*!
 * Tests for language table lookups and ISO code utilities
 */

use livetrans::language_utils::{
    self, FALLBACK_LANGUAGE_CODE, LANGUAGES, LanguageId, code_for_display_name, display_name_for_code,
    get_language_name, normalize_to_part1_or_part3, resolve_target_language,
};

#[test]
fn test_languageTable_shouldHaveUniqueNamesAndCodes() {
    for (i, (name, code)) in LANGUAGES.iter().enumerate() {
        for (other_name, other_code) in &LANGUAGES[i + 1..] {
            assert_ne!(name, other_name);
            assert_ne!(code, other_code);
        }
    }
    assert_eq!(LANGUAGES.len(), 14);
}

#[test]
fn test_codeForDisplayName_withNameOrCode_shouldResolve() {
    assert_eq!(code_for_display_name("繁體中文"), Some("zh-Hant"));
    assert_eq!(code_for_display_name("Français"), Some("fr"));
    assert_eq!(code_for_display_name("FR"), Some("fr"));
    assert_eq!(code_for_display_name("Klingon"), None);
}

#[test]
fn test_displayNameForCode_withChineseVariants_shouldMapToTable() {
    assert_eq!(display_name_for_code("zh"), Some("简体中文"));
    assert_eq!(display_name_for_code("zh-CN"), Some("简体中文"));
    assert_eq!(display_name_for_code("zh-TW"), Some("繁體中文"));
    assert_eq!(display_name_for_code("zh-Hant"), Some("繁體中文"));
    assert_eq!(display_name_for_code("sv"), None);
}

#[test]
fn test_resolveTargetLanguage_withUnknownName_shouldFallBackSilently() {
    assert_eq!(resolve_target_language("Español"), LanguageId::code("es"));
    assert_eq!(resolve_target_language("Elvish"), LanguageId::code(FALLBACK_LANGUAGE_CODE));
    assert_eq!(resolve_target_language(""), LanguageId::code(FALLBACK_LANGUAGE_CODE));
}

#[test]
fn test_languageId_unknown_shouldRenderFallbackCode() {
    assert!(!LanguageId::Unknown.is_known());
    assert_eq!(LanguageId::Unknown.code_or_fallback(), "en");
    assert_eq!(LanguageId::code("ko").code_or_fallback(), "ko");
    assert_eq!(LanguageId::Unknown.to_string(), "unknown");
}

#[test]
fn test_normalizeToPart1OrPart3_withDetectorCodes_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part3("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part3("cmn").unwrap(), "cmn");
    assert_eq!(normalize_to_part1_or_part3("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part3(" FR ").unwrap(), "fr");
    assert!(normalize_to_part1_or_part3("xx").is_err());
    assert!(normalize_to_part1_or_part3("english").is_err());
}

#[test]
fn test_getLanguageName_withScriptSuffix_shouldIgnoreSuffix() {
    assert_eq!(get_language_name("zh-Hant").unwrap(), "Chinese");
    assert_eq!(get_language_name("mt").unwrap(), "Maltese");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_isSupportedDisplayName_shouldMatchTableNamesOnly() {
    assert!(language_utils::is_supported_display_name("한국어"));
    assert!(!language_utils::is_supported_display_name("ko"));
}
