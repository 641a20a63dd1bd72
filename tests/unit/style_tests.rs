/*!
 * Tests for style resolution heuristics
 */

use livetrans::translation::style::{DICTIONARY_OVERRIDE_NOTICE, Style, has_sentence_shape, has_word_shape, resolve};

#[test]
fn test_resolve_withSingleWordDefault_shouldPromoteWithoutNotice() {
    let decision = resolve("cat", Style::Default);
    assert_eq!(decision.effective_style, Style::Dictionary);
    assert!(decision.override_notice.is_none());
}

#[test]
fn test_resolve_withSentenceDefault_shouldStayDefault() {
    let decision = resolve("The cat sat on the mat.", Style::Default);
    assert_eq!(decision.effective_style, Style::Default);
    assert!(decision.override_notice.is_none());
}

#[test]
fn test_resolve_withSingleIdeograph_shouldPromote() {
    assert_eq!(resolve("猫", Style::Default).effective_style, Style::Dictionary);
    assert_eq!(resolve("ありがとう", Style::Default).effective_style, Style::Dictionary);
}

#[test]
fn test_resolve_withCjkPunctuation_shouldStayDefault() {
    assert_eq!(resolve("我今天很开心，谢谢你。", Style::Default).effective_style, Style::Default);
}

#[test]
fn test_resolve_withLongCjkText_shouldStayDefault() {
    assert_eq!(resolve("我今天很开心谢谢你", Style::Default).effective_style, Style::Default);
}

#[test]
fn test_resolve_withSentenceDictionary_shouldDemoteWithNotice() {
    let decision = resolve("hello world, how are you today and tomorrow", Style::Dictionary);
    assert_eq!(decision.effective_style, Style::Default);
    assert_eq!(decision.override_notice, Some(DICTIONARY_OVERRIDE_NOTICE));
    assert!(!DICTIONARY_OVERRIDE_NOTICE.is_empty());
}

#[test]
fn test_resolve_withWordDictionary_shouldKeepDictionary() {
    let decision = resolve("serendipity", Style::Dictionary);
    assert_eq!(decision.effective_style, Style::Dictionary);
    assert!(decision.override_notice.is_none());
}

#[test]
fn test_resolve_withToneStyles_shouldPassThrough() {
    for style in [Style::Academic, Style::WebChat, Style::Casual] {
        let decision = resolve("cat", style);
        assert_eq!(decision.effective_style, style);
        assert!(decision.override_notice.is_none());
    }
}

#[test]
fn test_resolve_withShortSpacedPhrase_shouldNotFlipBetweenStyles() {
    // Looks like a word (short) and like a sentence (two tokens)
    assert!(has_word_shape("ice cream"));
    assert!(has_sentence_shape("ice cream"));

    let demoted = resolve("ice cream", Style::Dictionary);
    assert_eq!(demoted.effective_style, Style::Default);
    assert_eq!(resolve("ice cream", demoted.effective_style).effective_style, Style::Default);
}

#[test]
fn test_resolve_reResolvingEffectiveStyle_shouldBeStable() {
    let samples = [
        "cat",
        "猫",
        "ice cream",
        "The cat sat on the mat.",
        "hello world, how are you today and tomorrow",
        "pneumonoultramicroscopicsilicovolcanoconiosis",
        "我今天很开心，谢谢你。",
        "",
    ];
    for text in samples {
        for requested in Style::ALL {
            let first = resolve(text, requested);
            let second = resolve(text, first.effective_style);
            assert_eq!(second.effective_style, first.effective_style, "flipped for {:?} from {:?}", text, requested);
        }
    }
}

#[test]
fn test_style_fromStr_shouldAcceptDisplayNames() {
    assert_eq!("Web Chat".parse::<Style>().unwrap(), Style::WebChat);
    assert_eq!("webchat".parse::<Style>().unwrap(), Style::WebChat);
    assert_eq!("academic".parse::<Style>().unwrap(), Style::Academic);
    assert!("Shouting".parse::<Style>().is_err());
}

#[test]
fn test_style_serde_shouldUseDisplayNames() {
    assert_eq!(serde_json::to_string(&Style::WebChat).unwrap(), "\"Web Chat\"");
    assert_eq!(serde_json::from_str::<Style>("\"Dictionary\"").unwrap(), Style::Dictionary);
}
