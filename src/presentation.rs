/*!
 * Presentation boundary of the request coordinator.
 *
 * The coordinator never touches a display directly. It sends ordered
 * events into a channel; whoever owns the display drains the channel on
 * its own task and applies them.
 */

use tokio::sync::mpsc;

use crate::translation::style::DICTIONARY_OVERRIDE_NOTICE;

/// Suffix appended when a generation is stopped or superseded
pub const STOPPED_SUFFIX: &str = "\n[Stopped]";

/// Prefix of error messages shown in place of a translation
pub const ERROR_PREFIX: &str = "Error: ";

/// One display update, tagged with the epoch of the request it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// Replace (`append == false`) or extend the translation text
    Display { epoch: u64, text: String, append: bool },
    /// Show or hide the loading indicator
    Loading { epoch: u64, active: bool },
}

impl PresentationEvent {
    /// Epoch of the request that produced the event
    pub fn epoch(&self) -> u64 {
        match self {
            Self::Display { epoch, .. } | Self::Loading { epoch, .. } => *epoch,
        }
    }
}

/// Sending half handed to the coordinator
pub type EventSender = mpsc::UnboundedSender<PresentationEvent>;

/// Receiving half drained by the presentation layer
pub type EventReceiver = mpsc::UnboundedReceiver<PresentationEvent>;

/// Create the presentation channel
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Translation text as a text widget would hold it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    text: String,
    loading: bool,
}

impl DisplayBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    pub fn apply(&mut self, event: &PresentationEvent) {
        match event {
            PresentationEvent::Display { text, append: true, .. } => self.text.push_str(text),
            PresentationEvent::Display { text, append: false, .. } => {
                self.text.clear();
                self.text.push_str(text);
            }
            PresentationEvent::Loading { active, .. } => self.loading = *active,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the loading indicator is showing
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Text without the override notice and stop suffix
    pub fn clean_text(&self) -> String {
        clean_translation(&self.text)
    }
}

/// Strip the override notice and a trailing `[Stopped]` from displayed text
pub fn clean_translation(text: &str) -> String {
    let notice = DICTIONARY_OVERRIDE_NOTICE.trim();
    let stopped = STOPPED_SUFFIX.trim();

    let mut content = text.trim().replace(notice, "").trim().to_string();
    if let Some(stripped) = content.strip_suffix(stopped) {
        content = stripped.trim().to_string();
    }
    content
}
