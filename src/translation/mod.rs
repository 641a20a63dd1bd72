/*!
 * Request handling for live translation.
 *
 * This module turns raw input into streamed translations. It is split into
 * several submodules:
 *
 * - `classifier`: Source language detection
 * - `style`: Requested vs effective style
 * - `prompts`: Prompt text per style
 * - `epoch`: Supersession and stop state
 * - `stream_filter`: Stop marker handling on model output
 * - `coordinator`: The request coordinator and its worker
 * - `target`: Target language selection
 */

// Re-export main types for easier usage
pub use self::classifier::LanguageClassifier;
pub use self::coordinator::{CoordinatorSettings, GenerationCoordinator, GenerationRequest};
pub use self::epoch::{CancellationToken, GenerationState};
pub use self::prompts::PromptText;
pub use self::style::{Style, StyleDecision};
pub use self::target::TargetSelector;

// Submodules
pub mod classifier;
pub mod coordinator;
pub mod epoch;
pub mod prompts;
pub mod stream_filter;
pub mod style;
pub mod target;
