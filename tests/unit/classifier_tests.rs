/*!
 * Tests for source language detection
 */

use livetrans::language_utils::LanguageId;
use livetrans::translation::LanguageClassifier;
use livetrans::translation::classifier::{is_cjk_ideograph, is_hangul, is_kana};

#[test]
fn test_detect_withKanaAndIdeographs_shouldPreferJapanese() {
    let classifier = LanguageClassifier::new("English");
    assert_eq!(classifier.detect("東京へ行きます"), LanguageId::code("ja"));
    assert_eq!(classifier.detect("カタカナ"), LanguageId::code("ja"));
}

#[test]
fn test_detect_withIdeographsOnly_shouldUseConfiguredChineseVariant() {
    let simplified = LanguageClassifier::new("English");
    let traditional = LanguageClassifier::new("繁體中文");
    assert_eq!(simplified.detect("我愛你"), LanguageId::code("zh"));
    assert_eq!(traditional.detect("我爱你"), LanguageId::code("zh-Hant"));
}

#[test]
fn test_detect_withHangul_shouldBeKorean() {
    let classifier = LanguageClassifier::default();
    assert_eq!(classifier.detect("안녕하세요"), LanguageId::code("ko"));
}

#[test]
fn test_detect_withIdeographsAndHangul_shouldPreferChinese() {
    let classifier = LanguageClassifier::default();
    assert_eq!(classifier.detect("韓國 안녕"), LanguageId::code("zh"));
}

#[test]
fn test_detect_withLatinSentence_shouldUseStatisticalDetector() {
    let classifier = LanguageClassifier::default();
    let detected = classifier.detect("The quick brown fox jumps over the lazy dog and runs far away from the farm");
    assert_eq!(detected, LanguageId::code("en"));
}

#[test]
fn test_detect_withSameInput_shouldBeDeterministic() {
    let classifier = LanguageClassifier::default();
    let text = "Ceci est une phrase assez longue pour que la détection soit fiable.";
    assert_eq!(classifier.detect(text), classifier.detect(text));
}

#[test]
fn test_detect_withNoLetters_shouldBeUnknown() {
    let classifier = LanguageClassifier::default();
    assert_eq!(classifier.detect("12345 !!!"), LanguageId::Unknown);
    assert_eq!(classifier.detect(""), LanguageId::Unknown);
}

#[test]
fn test_detectDisplayName_shouldMapThroughLanguageTable() {
    let classifier = LanguageClassifier::default();
    assert_eq!(classifier.detect_display_name("こんにちは"), Some("日本語"));
    assert_eq!(classifier.detect_display_name("   "), None);
}

#[test]
fn test_scriptRanges_shouldMatchBlockBoundaries() {
    assert!(is_kana('\u{30FF}'));
    assert!(!is_kana('\u{3100}'));
    assert!(is_cjk_ideograph('\u{4E00}'));
    assert!(is_cjk_ideograph('\u{9FFF}'));
    assert!(!is_cjk_ideograph('\u{3400}'));
    assert!(is_hangul('\u{D7A3}'));
    assert!(!is_hangul('\u{1100}'));
}
