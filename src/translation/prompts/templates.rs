/*!
 * Prompt templates for each translation style.
 *
 * Prompts are plain instruction text followed by the input; the backend
 * wraps the result in its translation envelope.
 */

use crate::language_utils::LanguageId;
use crate::translation::style::{Style, StyleDecision};

/// Dictionary instruction, split around the target-language slots.
const DICTIONARY_HEAD: &str = "You are a dictionary formatter.\n\
Your task is to output EXACTLY 5 lines and NOTHING ELSE.\n\
Any extra text, titles, labels, numbering, markdown, or explanations are STRICTLY FORBIDDEN.\n\n\
FORMAT (STRICT):\n\
Line 1: IPA pronunciation enclosed in slashes, and ONLY IPA. Example: /kæt/\n\
Line 2: Part of speech ONLY. Example: noun, verb, adjective\n";

const DICTIONARY_TAIL: &str = "NEGATIVE CONSTRAINTS (DO NOT DO THESE):\n\
- Do NOT use words like Definition, Example, Translation\n\
- Do NOT use headers, bullet points, numbers, or markdown\n\
- Do NOT add explanations or notes\n\
- Do NOT repeat the word\n\n\
WORD: ";

/// Model-ready prompt for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText {
    source: LanguageId,
    target: LanguageId,
    instruction: String,
}

impl PromptText {
    /// Code of the detected source language (fallback when unknown)
    pub fn source_code(&self) -> &str {
        self.source.code_or_fallback()
    }

    /// Code of the target language (fallback when unknown)
    pub fn target_code(&self) -> &str {
        self.target.code_or_fallback()
    }

    /// Style instruction and input text
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Render the prompt in the plain translation envelope
    pub fn render(&self) -> String {
        format!(
            "Translate from {} to {}:\n{}",
            self.source_code(),
            self.target_code(),
            self.instruction
        )
    }
}

/// Trim whitespace and one layer of enclosing straight quotes
pub fn clean_input(text: &str) -> String {
    let trimmed = text.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

fn dictionary_prompt(text: &str, target: &str) -> String {
    format!(
        "{DICTIONARY_HEAD}\
Line 3: Definition written in {target}. No labels.\n\
Line 4: List one example sentence in the original language of WORD. No labels.\n\
Line 5: Translation of line 4 written in {target}. No labels.\n\n\
{DICTIONARY_TAIL}{text}"
    )
}

fn tone_directive(style: Style, target: &str) -> Option<String> {
    let tone = match style {
        Style::Academic => "a formal, academic, and scientific tone",
        Style::WebChat => {
            "an casual tone suitable for online messaging. You can use common abbreviations, slang like a real person would"
        }
        Style::Casual => "a natural, casual, and conversational tone",
        Style::Default | Style::Dictionary => return None,
    };
    Some(format!("(Translate the following text into {} using {}):\n", target, tone))
}

/// Build the prompt for `text` under an already resolved style.
///
/// `text` is used as given; callers pass it through [`clean_input`] first.
pub fn build(text: &str, source: &LanguageId, target: &LanguageId, decision: &StyleDecision) -> PromptText {
    let text = text.to_string();
    let target_code = target.code_or_fallback();

    let instruction = match decision.effective_style {
        Style::Dictionary => dictionary_prompt(&text, target_code),
        style => match tone_directive(style, target_code) {
            Some(directive) => directive + &text,
            None => text,
        },
    };

    PromptText {
        source: source.clone(),
        target: target.clone(),
        instruction,
    }
}
