/*!
 * Model backends for streaming translation.
 *
 * This module contains the model contract used by the request coordinator
 * and its implementations:
 * - Ollama: Local LLM server with streaming generation
 * - Mock: Scripted in-process model for tests and offline runs
 */

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::translation::prompts::PromptText;

/// One piece of streamed model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Generated text, possibly containing stop markers
    pub text: String,
}

impl TextChunk {
    /// Create a chunk from text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Stream of generated chunks
pub type ChunkStream = BoxStream<'static, Result<TextChunk, ProviderError>>;

/// A loaded model that can stream generations
///
/// The model is a single-consumer resource; callers must not drive two
/// streams from it at the same time.
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Name of the loaded model
    fn name(&self) -> &str;

    /// Start generating a response to `prompt`
    ///
    /// # Arguments
    /// * `prompt` - The prompt to answer
    /// * `max_tokens` - Upper bound on generated tokens
    ///
    /// # Returns
    /// * `Result<ChunkStream, ProviderError>` - The chunk stream, or an error if generation could not start
    async fn stream_generate(&self, prompt: &PromptText, max_tokens: u32) -> Result<ChunkStream, ProviderError>;
}

/// Loads a model by reference (model name or path)
#[async_trait]
pub trait ModelLoader: Send + Sync + Debug {
    /// Load the model; failure is fatal to the session
    async fn load(&self, model_ref: &str) -> Result<Arc<dyn LanguageModel>, ProviderError>;
}

pub mod mock;
pub mod ollama;
