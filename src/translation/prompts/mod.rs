/*!
 * Prompt construction for translation requests.
 *
 * This module provides:
 * - Fixed instruction templates per translation style
 * - Input cleanup shared with the request coordinator
 * - The rendered prompt handed to model backends
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptText, build, clean_input};
