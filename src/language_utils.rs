use anyhow::{Result, anyhow};
use isolang::Language;
use std::fmt;

/// Language utilities for the translator
///
/// This module owns the fixed table of languages the translator offers,
/// the lookups between display names and internal codes, and the ISO 639
/// normalization used to interpret detector output.

/// Code substituted whenever a language cannot be resolved
pub const FALLBACK_LANGUAGE_CODE: &str = "en";

/// Display names and internal codes of the offered languages, in menu order
pub const LANGUAGES: &[(&str, &str)] = &[
    ("简体中文", "zh"),
    ("繁體中文", "zh-Hant"),
    ("English", "en"),
    ("日本語", "ja"),
    ("한국어", "ko"),
    ("Français", "fr"),
    ("Deutsch", "de"),
    ("Italiano", "it"),
    ("Español", "es"),
    ("Русский", "ru"),
    ("Português", "pt"),
    ("العربية", "ar"),
    ("हिन्दी", "hi"),
    ("Malti", "mt"),
];

/// Display name of traditional Chinese; selects the `zh-Hant` preference
pub const TRADITIONAL_CHINESE: &str = "繁體中文";

/// Identifier of a language as used in prompts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// A known internal code such as `en` or `zh-Hant`
    Code(String),
    /// Detection gave no answer
    Unknown,
}

impl LanguageId {
    /// Create a language id from a code
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }

    /// Whether the language is known
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Code(_))
    }

    /// The code, or the fallback code for an unknown language
    pub fn code_or_fallback(&self) -> &str {
        match self {
            Self::Code(code) if !code.trim().is_empty() => code,
            _ => FALLBACK_LANGUAGE_CODE,
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Look up the internal code of a display name.
///
/// Codes from the table are accepted as well, so `"fr"` and `"Français"`
/// both resolve to `fr`.
pub fn code_for_display_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    LANGUAGES
        .iter()
        .find(|(display, code)| *display == name || code.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Look up the display name of an internal or detector code
pub fn display_name_for_code(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    let canonical = match code.as_str() {
        "zh-cn" | "zh-hans" => "zh",
        "zh-tw" | "zh-hant" => "zh-Hant",
        other => other,
    };
    LANGUAGES
        .iter()
        .find(|(_, table_code)| *table_code == canonical)
        .map(|(display, _)| *display)
}

/// Whether a display name is one of the offered languages
pub fn is_supported_display_name(name: &str) -> bool {
    LANGUAGES.iter().any(|(display, _)| *display == name.trim())
}

/// Resolve a caller-supplied target language, falling back silently
pub fn resolve_target_language(name: &str) -> LanguageId {
    match code_for_display_name(name) {
        Some(code) => LanguageId::code(code),
        None => {
            log::debug!("Unknown target language '{}', using '{}'", name, FALLBACK_LANGUAGE_CODE);
            LanguageId::code(FALLBACK_LANGUAGE_CODE)
        }
    }
}

/// Map an ISO 639-2/B code onto its ISO 639-2/T form
fn part2b_to_part2t(code: &str) -> &str {
    match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        other => other,
    }
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to the 3-letter code if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part3(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part3 = part2b_to_part2t(&normalized_code);
        if let Some(lang) = Language::from_639_3(part3) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
            return Ok(part3.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English language name from a code
///
/// Region or script suffixes (`zh-Hant`) are ignored.
pub fn get_language_name(code: &str) -> Result<String> {
    let base = code.split('-').next().unwrap_or(code);
    let normalized = normalize_to_part1_or_part3(base)?;
    let lang = if normalized.len() == 2 {
        Language::from_639_1(&normalized)
    } else {
        Language::from_639_3(&normalized)
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
