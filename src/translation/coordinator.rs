/*!
 * Request coordination for streaming translation.
 *
 * A single worker task owns the loaded model and is therefore the only
 * consumer of a model stream. Submissions never wait: they supersede the
 * running generation by advancing the epoch, and park their request in a
 * one-slot queue where a newer request simply replaces an older one that
 * has not started yet. The worker picks the request up once the previous
 * generation has fully ended.
 */

use futures_util::StreamExt;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::app_config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_NATIVE_LANGUAGE};
use crate::errors::TranslationError;
use crate::language_utils::{self, LanguageId};
use crate::presentation::{ERROR_PREFIX, EventSender, PresentationEvent, STOPPED_SUFFIX};
use crate::providers::{LanguageModel, ModelLoader};

use super::classifier::LanguageClassifier;
use super::epoch::{CancellationToken, GenerationState};
use super::prompts;
use super::stream_filter::strip_stop_markers;
use super::style::{self, Style};

/// One submitted translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Input text, trimmed and unquoted
    pub text: String,
    /// Target language
    pub target_language: LanguageId,
    /// Style the caller asked for
    pub requested_style: Style,
    /// Epoch assigned at submission
    pub epoch: u64,
}

/// Settings fixed for the lifetime of a coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Model name or path handed to the loader
    pub model_ref: String,
    /// Token budget per generation
    pub max_tokens: u32,
    /// Native language display name, used for Chinese variant preference
    pub native_language: String,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            model_ref: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            native_language: DEFAULT_NATIVE_LANGUAGE.to_string(),
        }
    }
}

/// How a generation ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamOutcome {
    Completed,
    Stopped,
}

/// Depth-one request queue between submitters and the worker
#[derive(Debug, Default)]
struct RequestSlot {
    pending: Mutex<Option<GenerationRequest>>,
    notify: Notify,
    closed: AtomicBool,
}

impl RequestSlot {
    /// Park `request`, replacing any request that has not started
    fn put(&self, request: GenerationRequest) {
        if let Some(dropped) = self.pending.lock().replace(request) {
            debug!("Request {} superseded before it started", dropped.epoch);
        }
        self.notify.notify_one();
    }

    /// Raise the stop flag under the slot lock
    ///
    /// A parked request stays; `next` clears the flag when it hands it over.
    fn stop(&self, state: &GenerationState) {
        let _pending = self.pending.lock();
        state.request_stop();
    }

    /// Raise the stop flag and drop the parked request, if any
    fn cancel(&self, state: &GenerationState) -> bool {
        let mut pending = self.pending.lock();
        state.request_stop();
        pending.take().is_some()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Wait for the next request and clear the stop flag for it
    ///
    /// Returns `None` once closed and drained. The flag is cleared under the
    /// slot lock, so a `stop` racing with the handoff is never lost.
    async fn next(&self, state: &GenerationState) -> Option<GenerationRequest> {
        loop {
            let parked = {
                let mut pending = self.pending.lock();
                let parked = pending.take();
                if parked.is_some() {
                    state.clear_stop();
                }
                parked
            };
            if parked.is_some() {
                return parked;
            }
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            self.notify.notified().await;
        }
    }
}

/// State shared between the submission side and the worker
#[derive(Debug)]
struct Shared {
    state: Arc<GenerationState>,
    events: EventSender,
    load_failed: AtomicBool,
    classifier: LanguageClassifier,
    max_tokens: u32,
}

impl Shared {
    fn display(&self, epoch: u64, text: impl Into<String>, append: bool) {
        // A closed channel means nobody is watching any more
        let _ = self.events.send(PresentationEvent::Display {
            epoch,
            text: text.into(),
            append,
        });
    }

    fn set_loading(&self, epoch: u64, active: bool) {
        let _ = self.events.send(PresentationEvent::Loading { epoch, active });
    }
}

/// Coordinates translation requests against a single model
#[derive(Debug)]
pub struct GenerationCoordinator {
    shared: Arc<Shared>,
    slot: Arc<RequestSlot>,
    worker: Option<JoinHandle<()>>,
}

impl GenerationCoordinator {
    /// Start the worker, which loads the model and then serves requests.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(loader: Arc<dyn ModelLoader>, settings: CoordinatorSettings, events: EventSender) -> Self {
        let shared = Arc::new(Shared {
            state: Arc::new(GenerationState::new()),
            events,
            load_failed: AtomicBool::new(false),
            classifier: LanguageClassifier::new(&settings.native_language),
            max_tokens: settings.max_tokens,
        });
        let slot = Arc::new(RequestSlot::default());

        let worker = tokio::spawn(run_worker(
            Arc::clone(&shared),
            Arc::clone(&slot),
            loader,
            settings.model_ref,
        ));

        Self {
            shared,
            slot,
            worker: Some(worker),
        }
    }

    /// Submit a request by language and style names.
    ///
    /// Unknown languages fall back to English and unknown styles to
    /// `Default`. Returns immediately.
    pub fn submit(&self, text: &str, target_language: &str, style: &str) {
        let requested_style = style.parse().unwrap_or_else(|e| {
            warn!("{}, using {}", e, Style::Default);
            Style::Default
        });
        self.submit_with(text, language_utils::resolve_target_language(target_language), requested_style);
    }

    /// Submit a request with an already resolved language and style
    pub fn submit_with(&self, text: &str, target_language: LanguageId, requested_style: Style) {
        if self.shared.load_failed.load(Ordering::SeqCst) {
            debug!("Model unavailable, ignoring request");
            return;
        }

        let state = &self.shared.state;
        state.request_stop();
        let epoch = state.advance();

        let request = GenerationRequest {
            text: prompts::clean_input(text),
            target_language,
            requested_style,
            epoch,
        };
        debug!("Request {} submitted: target {}, style {}", epoch, request.target_language, requested_style);

        self.slot.put(request);
    }

    /// Stop the running generation without submitting a new one.
    ///
    /// A request that has not started yet still runs afterwards.
    pub fn stop(&self) {
        debug!("Stop requested");
        self.slot.stop(&self.shared.state);
    }

    /// Stop the running generation and drop a request that has not started
    pub fn cancel(&self) {
        if self.slot.cancel(&self.shared.state) {
            debug!("Dropped a request that had not started");
        }
    }

    /// Epoch of the most recent submission
    pub fn current_epoch(&self) -> u64 {
        self.shared.state.snapshot()
    }

    /// Whether the model failed to load
    pub fn is_model_unavailable(&self) -> bool {
        self.shared.load_failed.load(Ordering::SeqCst)
    }

    /// Let the worker finish the running and parked requests, then wait for it
    pub async fn shutdown(mut self) {
        self.slot.close();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                error!("Generation worker panicked: {}", e);
            }
        }
    }
}

impl Drop for GenerationCoordinator {
    fn drop(&mut self) {
        self.slot.close();
    }
}

async fn run_worker(shared: Arc<Shared>, slot: Arc<RequestSlot>, loader: Arc<dyn ModelLoader>, model_ref: String) {
    info!("Loading model {}...", model_ref);
    let model = match loader.load(&model_ref).await {
        Ok(model) => {
            info!("Model ready: {}", model.name());
            model
        }
        Err(e) => {
            let failure = TranslationError::ModelUnavailable(e.to_string());
            error!("{}", failure);
            shared.load_failed.store(true, Ordering::SeqCst);
            shared.display(shared.state.snapshot(), format!("{}{}", ERROR_PREFIX, failure), false);
            return;
        }
    };

    while let Some(request) = slot.next(&shared.state).await {
        if !shared.state.is_current(request.epoch) {
            debug!("Skipping superseded request {}", request.epoch);
            continue;
        }

        let token = shared.state.token(request.epoch);
        run_generation(&shared, model.as_ref(), &request, &token).await;
    }

    debug!("Generation worker finished");
}

async fn run_generation(shared: &Shared, model: &dyn LanguageModel, request: &GenerationRequest, token: &CancellationToken) {
    let epoch = token.epoch();
    shared.set_loading(epoch, true);

    match stream_translation(shared, model, request, token).await {
        Ok(StreamOutcome::Completed) => {
            shared.set_loading(epoch, false);
            info!("Generation {} finished", epoch);
        }
        Ok(StreamOutcome::Stopped) => info!("Generation {} stopped", epoch),
        Err(e) => {
            error!("Generation {} failed: {}", epoch, e);
            shared.set_loading(epoch, false);
            shared.display(epoch, format!("{}{}", ERROR_PREFIX, e), false);
        }
    }
}

async fn stream_translation(
    shared: &Shared,
    model: &dyn LanguageModel,
    request: &GenerationRequest,
    token: &CancellationToken,
) -> Result<StreamOutcome, TranslationError> {
    let epoch = token.epoch();

    let source = shared.classifier.detect(&request.text);
    let decision = style::resolve(&request.text, request.requested_style);
    if decision.effective_style != request.requested_style {
        debug!("Request {}: style {} -> {}", epoch, request.requested_style, decision.effective_style);
    }

    let prompt = prompts::build(&request.text, &source, &request.target_language, &decision);
    debug!("Request {}: {} -> {}, style {}", epoch, prompt.source_code(), prompt.target_code(), decision.effective_style);

    let mut chunks = model.stream_generate(&prompt, shared.max_tokens).await?;
    drop(prompt);

    let mut first_output = true;
    while let Some(chunk) = chunks.next().await {
        if token.is_cancelled() {
            shared.set_loading(epoch, false);
            shared.display(epoch, STOPPED_SUFFIX, true);
            return Ok(StreamOutcome::Stopped);
        }

        let filtered = strip_stop_markers(&chunk?.text);
        if !filtered.text.is_empty() {
            if first_output {
                shared.set_loading(epoch, false);
                shared.display(epoch, "", false);
                if let Some(notice) = decision.override_notice {
                    shared.display(epoch, notice, true);
                }
                first_output = false;
            }
            shared.display(epoch, filtered.text, true);
        }

        if filtered.reached_stop {
            break;
        }
    }

    Ok(StreamOutcome::Completed)
}
