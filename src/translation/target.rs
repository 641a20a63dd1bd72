/*!
 * Target language selection.
 *
 * Input in the native language goes to the most recently used foreign
 * language; everything else goes to the native language.
 */

use log::debug;

use super::classifier::LanguageClassifier;

/// Picks target languages by display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    native: String,
    last_foreign: String,
}

impl TargetSelector {
    /// Create a selector; `primary_foreign` is the initial foreign language
    pub fn new(native: impl Into<String>, primary_foreign: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            last_foreign: primary_foreign.into(),
        }
    }

    /// Native language display name
    pub fn native(&self) -> &str {
        &self.native
    }

    /// Most recently used foreign language
    pub fn last_foreign(&self) -> &str {
        &self.last_foreign
    }

    /// Target for fresh input
    pub fn auto_select(&self, text: &str, classifier: &LanguageClassifier) -> String {
        match classifier.detect_display_name(text) {
            Some(name) if name == self.native => {
                debug!("Input detected as native language {}", name);
                self.last_foreign.clone()
            }
            detected => {
                debug!("Input detected as {:?}", detected);
                self.native.clone()
            }
        }
    }

    /// Remember `target` when it is a foreign language
    pub fn note_target(&mut self, target: &str) {
        if target != self.native {
            self.last_foreign = target.to_string();
        }
    }

    /// Target after swapping the translation into the input
    ///
    /// `original_text` is the input before the swap.
    pub fn swap_target(&mut self, original_text: &str, current_target: &str, classifier: &LanguageClassifier) -> String {
        if let Some(origin) = classifier.detect_display_name(original_text) {
            if origin != current_target {
                self.note_target(origin);
                return origin.to_string();
            }
        }

        if current_target == self.native {
            self.last_foreign.clone()
        } else {
            self.last_foreign = current_target.to_string();
            self.native.clone()
        }
    }
}
