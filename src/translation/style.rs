/*!
 * Rendering styles and the Default/Dictionary reclassification.
 *
 * Only `Default` and `Dictionary` requests are reclassified. Short
 * word-like input asked for in `Default` becomes a dictionary lookup;
 * sentence-like input asked for in `Dictionary` falls back to `Default`
 * with a notice. The two shape predicates are near-complements, not exact
 * ones: text can have both shapes (`"hello world"`) or neither.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::classifier::is_cjk_or_kana;

/// Punctuation that marks input as a phrase or sentence
pub const SENTENCE_PUNCTUATION: &[char] = &['，', '。', '！', '？', '；', '：', ',', '.', '!', '?', ';', ':'];

/// Notice shown when a dictionary request is answered in Default style
pub const DICTIONARY_OVERRIDE_NOTICE: &str =
    "⚠️ [Mode Switch: Input detected as a phrase/sentence. Switching to Default style...]\n\n";

/// Longest CJK/kana input still treated as a single word
const MAX_CJK_WORD_LEN: usize = 6;

/// Length below which spaced Latin text still counts as a short phrase
const MAX_PHRASE_LEN: usize = 20;

/// Translation rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    Default,
    Academic,
    #[serde(rename = "Web Chat")]
    WebChat,
    Casual,
    Dictionary,
}

impl Style {
    /// All styles in menu order
    pub const ALL: [Style; 5] = [
        Style::Default,
        Style::Academic,
        Style::WebChat,
        Style::Casual,
        Style::Dictionary,
    ];

    /// Name shown to the user
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Academic => "Academic",
            Self::WebChat => "Web Chat",
            Self::Casual => "Casual",
            Self::Dictionary => "Dictionary",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Style {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_').collect();
        Style::ALL
            .into_iter()
            .find(|style| style.display_name().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| anyhow!("Invalid style: {}", s))
    }
}

/// Outcome of style resolution for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecision {
    /// Style used to build the prompt
    pub effective_style: Style,
    /// Notice to show ahead of the output, if the request was overridden
    pub override_notice: Option<&'static str>,
}

impl StyleDecision {
    fn unchanged(style: Style) -> Self {
        Self {
            effective_style: style,
            override_notice: None,
        }
    }
}

fn has_sentence_punctuation(text: &str) -> bool {
    text.chars().any(|c| SENTENCE_PUNCTUATION.contains(&c))
}

/// Whether `text` looks like a single word or short phrase
pub fn has_word_shape(text: &str) -> bool {
    let text = text.trim();
    if has_sentence_punctuation(text) {
        return false;
    }

    let length = text.chars().count();
    if text.chars().any(is_cjk_or_kana) {
        length <= MAX_CJK_WORD_LEN
    } else {
        !text.contains(' ') || length < MAX_PHRASE_LEN
    }
}

/// Whether `text` looks like a phrase or sentence rather than a word
pub fn has_sentence_shape(text: &str) -> bool {
    text.split_whitespace().count() > 1
        || has_sentence_punctuation(text)
        || text.chars().count() > MAX_PHRASE_LEN
        || text.chars().filter(|c| is_cjk_or_kana(*c)).count() > MAX_CJK_WORD_LEN
}

/// Decide the style actually used for `text`.
///
/// Promotion additionally requires the text not to have sentence shape, so
/// that feeding a decision's effective style back in never flips it again.
pub fn resolve(text: &str, requested: Style) -> StyleDecision {
    match requested {
        Style::Default if has_word_shape(text) && !has_sentence_shape(text) => {
            StyleDecision::unchanged(Style::Dictionary)
        }
        Style::Dictionary if has_sentence_shape(text) => StyleDecision {
            effective_style: Style::Default,
            override_notice: Some(DICTIONARY_OVERRIDE_NOTICE),
        },
        other => StyleDecision::unchanged(other),
    }
}
