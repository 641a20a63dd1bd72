/*!
 * Mock model implementations for testing.
 *
 * This module provides mock models that simulate different behaviors:
 * - `MockModel::scripted()` - Streams a fixed chunk sequence for every prompt
 * - `MockModel::echo()` - Streams the prompt instruction back word by word
 * - `MockModel::failing_after()` - Fails after a number of chunks
 * - `MockLoader::failing()` - Fails to load at all
 *
 * Every model records the prompts it received and how many streams were
 * open at once, so tests can check the single-consumer rule.
 */

use async_trait::async_trait;
use futures::stream;
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::errors::ProviderError;
use crate::providers::{ChunkStream, LanguageModel, ModelLoader, TextChunk};
use crate::translation::prompts::PromptText;

/// Behavior mode for the mock model
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Stream the same chunks for every prompt
    Scripted(Vec<String>),
    /// Stream the prompt instruction back, one word per chunk
    Echo,
    /// Stream the chunks, then fail with the message
    FailingAfter { chunks: Vec<String>, message: String },
    /// Refuse to start generating
    Failing(String),
}

/// Counts streams that are currently open
#[derive(Debug, Default)]
struct StreamTracker {
    active: AtomicUsize,
    max_active: AtomicUsize,
    started: AtomicUsize,
}

/// Decrements the active stream count when the stream is dropped
struct ActiveStreamGuard {
    tracker: Arc<StreamTracker>,
}

impl ActiveStreamGuard {
    fn open(tracker: &Arc<StreamTracker>) -> Self {
        let now = tracker.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracker.max_active.fetch_max(now, Ordering::SeqCst);
        tracker.started.fetch_add(1, Ordering::SeqCst);
        Self {
            tracker: Arc::clone(tracker),
        }
    }
}

impl Drop for ActiveStreamGuard {
    fn drop(&mut self) {
        self.tracker.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock model for testing streaming behavior
#[derive(Debug, Clone)]
pub struct MockModel {
    /// Behavior mode
    behavior: MockBehavior,
    /// Delay before each chunk
    chunk_delay: Option<Duration>,
    /// When set, each chunk waits for a permit
    gate: Option<Arc<Semaphore>>,
    /// Prompts received, rendered
    prompts: Arc<Mutex<Vec<String>>>,
    /// Open stream bookkeeping
    tracker: Arc<StreamTracker>,
}

impl MockModel {
    /// Create a new mock model with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            chunk_delay: None,
            gate: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            tracker: Arc::new(StreamTracker::default()),
        }
    }

    /// Create a model that streams `chunks` for every prompt
    pub fn scripted<S: Into<String>>(chunks: impl IntoIterator<Item = S>) -> Self {
        Self::new(MockBehavior::Scripted(chunks.into_iter().map(Into::into).collect()))
    }

    /// Create a model that echoes the prompt instruction
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a model that streams `chunks` and then fails
    pub fn failing_after<S: Into<String>>(chunks: impl IntoIterator<Item = S>, message: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingAfter {
            chunks: chunks.into_iter().map(Into::into).collect(),
            message: message.into(),
        })
    }

    /// Create a model that refuses every generation
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing(message.into()))
    }

    /// Wait `delay` before each chunk
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Release chunks only as permits are added to `gate`
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Rendered prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of streams started
    pub fn streams_started(&self) -> usize {
        self.tracker.started.load(Ordering::SeqCst)
    }

    /// Highest number of streams open at the same time
    pub fn max_concurrent_streams(&self) -> usize {
        self.tracker.max_active.load(Ordering::SeqCst)
    }

    fn script_for(&self, prompt: &PromptText) -> (Vec<String>, Option<String>) {
        match &self.behavior {
            MockBehavior::Scripted(chunks) => (chunks.clone(), None),
            MockBehavior::Echo => {
                let words = prompt.instruction()
                    .split_inclusive(' ')
                    .map(str::to_string)
                    .collect();
                (words, None)
            }
            MockBehavior::FailingAfter { chunks, message } => (chunks.clone(), Some(message.clone())),
            MockBehavior::Failing(message) => (Vec::new(), Some(message.clone())),
        }
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream_generate(&self, prompt: &PromptText, _max_tokens: u32) -> Result<ChunkStream, ProviderError> {
        self.prompts.lock().push(prompt.render());

        if let MockBehavior::Failing(message) = &self.behavior {
            return Err(ProviderError::RequestFailed(message.clone()));
        }

        let (chunks, failure) = self.script_for(prompt);
        let items = chunks
            .into_iter()
            .map(|text| Ok(TextChunk::new(text)))
            .chain(failure.map(|message| Err(ProviderError::StreamInterrupted(message))));

        let guard = Arc::new(ActiveStreamGuard::open(&self.tracker));
        let delay = self.chunk_delay;
        let gate = self.gate.clone();

        let chunk_stream = stream::iter(items).then(move |item| {
            let gate = gate.clone();
            let guard = Arc::clone(&guard);
            async move {
                if let Some(gate) = gate {
                    if let Ok(permit) = gate.acquire().await {
                        permit.forget();
                    }
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                drop(guard);
                item
            }
        });

        Ok(chunk_stream.boxed())
    }
}

/// Mock loader returning a prepared model
#[derive(Debug, Clone)]
pub struct MockLoader {
    model: Option<MockModel>,
    failure: Option<String>,
}

impl MockLoader {
    /// Create a loader that hands out `model`
    pub fn new(model: MockModel) -> Self {
        Self {
            model: Some(model),
            failure: None,
        }
    }

    /// Create a loader that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            model: None,
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    async fn load(&self, model_ref: &str) -> Result<Arc<dyn LanguageModel>, ProviderError> {
        match (&self.model, &self.failure) {
            (Some(model), None) => Ok(Arc::new(model.clone())),
            (_, Some(message)) => Err(ProviderError::ModelNotFound(format!("{}: {}", model_ref, message))),
            (None, None) => Err(ProviderError::ModelNotFound(model_ref.to_string())),
        }
    }
}
