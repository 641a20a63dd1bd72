/*!
 * Heuristic source-language detection.
 *
 * Scripts that identify a language on their own (kana, CJK ideographs,
 * Hangul) are checked first; everything else goes to a trigram detector.
 */

use log::debug;
use whatlang::Detector;

use crate::language_utils::{self, LanguageId, TRADITIONAL_CHINESE};

/// Hiragana and Katakana
pub fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{30FF}').contains(&c)
}

/// CJK Unified Ideographs
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Hangul syllables
pub fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Ideograph or kana; the script class the style heuristics count
pub fn is_cjk_or_kana(c: char) -> bool {
    is_cjk_ideograph(c) || is_kana(c)
}

/// Language classifier for input text
#[derive(Debug)]
pub struct LanguageClassifier {
    /// Code reported for Chinese text
    chinese_code: &'static str,

    /// Statistical detector for non-CJK text
    detector: Detector,
}

impl LanguageClassifier {
    /// Create a classifier for a user whose native language is `native_language`.
    ///
    /// The native language only decides whether Chinese text is reported
    /// as simplified or traditional.
    pub fn new(native_language: &str) -> Self {
        let chinese_code = if native_language.trim() == TRADITIONAL_CHINESE {
            "zh-Hant"
        } else {
            "zh"
        };

        Self {
            chinese_code,
            detector: Detector::new(),
        }
    }

    /// Detect the language of `text`
    pub fn detect(&self, text: &str) -> LanguageId {
        if text.chars().any(is_kana) {
            return LanguageId::code("ja");
        }
        if text.chars().any(is_cjk_ideograph) {
            return LanguageId::code(self.chinese_code);
        }
        if text.chars().any(is_hangul) {
            return LanguageId::code("ko");
        }

        self.detect_statistical(text)
    }

    /// Detect the display name of the input language, if it is one we offer
    pub fn detect_display_name(&self, text: &str) -> Option<&'static str> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match self.detect(text) {
            LanguageId::Code(code) => language_utils::display_name_for_code(&code),
            LanguageId::Unknown => None,
        }
    }

    fn detect_statistical(&self, text: &str) -> LanguageId {
        let Some(info) = self.detector.detect(text) else {
            debug!("Language detector gave no answer");
            return LanguageId::Unknown;
        };

        match language_utils::normalize_to_part1_or_part3(info.lang().code()) {
            Ok(code) => {
                debug!("Detected '{}' (confidence {:.2})", code, info.confidence());
                LanguageId::code(code)
            }
            Err(e) => {
                debug!("Unusable detector result: {}", e);
                LanguageId::Unknown
            }
        }
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new(crate::app_config::DEFAULT_NATIVE_LANGUAGE)
    }
}
