/*!
 * Tests for prompt construction
 */

use livetrans::language_utils::LanguageId;
use livetrans::translation::prompts::{build, clean_input};
use livetrans::translation::style::{Style, StyleDecision, resolve};

fn decision(style: Style) -> StyleDecision {
    StyleDecision {
        effective_style: style,
        override_notice: None,
    }
}

#[test]
fn test_build_withDefaultStyle_shouldPassCleanedTextThrough() {
    let text = clean_input("  'Guten Morgen, Welt.'  ");
    let prompt = build(&text, &LanguageId::code("de"), &LanguageId::code("en"), &decision(Style::Default));
    assert_eq!(prompt.instruction(), "Guten Morgen, Welt.");
    assert_eq!(prompt.render(), "Translate from de to en:\nGuten Morgen, Welt.");
}

#[test]
fn test_build_withInnerQuoteLayer_shouldNotUnquoteAgain() {
    let text = clean_input("\"'it is a quoted phrase, really'\"");
    let prompt = build(&text, &LanguageId::code("en"), &LanguageId::code("fr"), &decision(Style::Academic));
    assert!(prompt.instruction().ends_with("scientific tone):\n'it is a quoted phrase, really'"));
}

#[test]
fn test_build_withToneStyles_shouldPrependDirectiveNamingTarget() {
    let source = LanguageId::code("en");
    let target = LanguageId::code("ja");

    let academic = build("Good morning.", &source, &target, &decision(Style::Academic));
    assert_eq!(
        academic.instruction(),
        "(Translate the following text into ja using a formal, academic, and scientific tone):\nGood morning."
    );

    let casual = build("Good morning.", &source, &target, &decision(Style::Casual));
    assert!(casual.instruction().starts_with("(Translate the following text into ja using a natural, casual"));

    let chat = build("Good morning.", &source, &target, &decision(Style::WebChat));
    assert!(chat.instruction().contains("online messaging"));
    assert!(chat.instruction().ends_with("):\nGood morning."));
}

#[test]
fn test_build_withDictionaryStyle_shouldRequireFiveLines() {
    let prompt = build("cat", &LanguageId::code("en"), &LanguageId::code("fr"), &resolve("cat", Style::Default));
    let instruction = prompt.instruction();

    assert!(instruction.contains("EXACTLY 5 lines"));
    for line in 1..=5 {
        assert!(instruction.contains(&format!("Line {}:", line)));
    }
    assert!(instruction.contains("Definition written in fr"));
    assert!(instruction.contains("NEGATIVE CONSTRAINTS"));
    assert!(instruction.ends_with("WORD: cat"));
}

#[test]
fn test_build_withUnknownLanguages_shouldSubstituteFallback() {
    let prompt = build("Hi.", &LanguageId::Unknown, &LanguageId::Unknown, &decision(Style::Casual));
    assert_eq!(prompt.source_code(), "en");
    assert_eq!(prompt.target_code(), "en");
    assert!(prompt.render().starts_with("Translate from en to en:\n(Translate the following text into en"));
}

#[test]
fn test_cleanInput_shouldStripOneQuoteLayerOnly() {
    assert_eq!(clean_input("  \"quoted\"  "), "quoted");
    assert_eq!(clean_input("'single'"), "single");
    assert_eq!(clean_input("\"\"double\"\""), "\"double\"");
    assert_eq!(clean_input("\" padded \""), " padded ");
    assert_eq!(clean_input("“curly”"), "“curly”");
    assert_eq!(clean_input("''"), "");
}
