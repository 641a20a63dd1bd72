/*!
 * # livetrans - Live streaming translation with a local language model
 *
 * A Rust library that sends text to a language model and streams the
 * translation back, staying correct when the user changes the input,
 * target language or style faster than the model responds.
 *
 * ## Features
 *
 * - Newest request wins: stale generations are stopped at the next chunk
 * - At most one consumer of the model stream at any time
 * - Source language detection for CJK scripts and common Latin languages
 * - Translation styles, with automatic Dictionary mode for single words
 * - Streaming backends:
 *   - Ollama (local LLM)
 *   - In-process mock for tests and offline runs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Request handling:
 *   - `translation::coordinator`: Request coordinator and worker
 *   - `translation::classifier`: Source language detection
 *   - `translation::style`: Style resolution
 *   - `translation::prompts`: Prompt construction
 *   - `translation::target`: Target language selection
 * - `presentation`: Events sent to whoever owns the display
 * - `app_controller`: Interactive session controller
 * - `language_utils`: Language table and ISO code utilities
 * - `providers`: Model backends:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted model
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod presentation;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use language_utils::{LanguageId, get_language_name};
pub use presentation::{DisplayBuffer, PresentationEvent};
pub use translation::{GenerationCoordinator, LanguageClassifier, Style};
