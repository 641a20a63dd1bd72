/*!
 * Common test utilities for the livetrans test suite
 */

use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use livetrans::presentation::{DisplayBuffer, EventReceiver, PresentationEvent};
use livetrans::providers::mock::{MockLoader, MockModel};
use livetrans::translation::{CoordinatorSettings, GenerationCoordinator};

/// Upper bound for waiting on coordinator events
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Start a coordinator around `model`
pub fn start_coordinator(model: &MockModel) -> (GenerationCoordinator, EventReceiver) {
    init_logging();
    let (events, receiver) = livetrans::presentation::channel();
    let loader = Arc::new(MockLoader::new(model.clone()));
    let coordinator = GenerationCoordinator::start(loader, CoordinatorSettings::default(), events);
    (coordinator, receiver)
}

/// A model whose chunks are released one permit at a time
pub fn gated_model<S: Into<String>>(chunks: impl IntoIterator<Item = S>) -> (MockModel, Arc<Semaphore>) {
    let gate = Arc::new(Semaphore::new(0));
    (MockModel::scripted(chunks).with_gate(Arc::clone(&gate)), gate)
}

/// Receive events until `done` holds for the events received so far
pub async fn wait_for(
    receiver: &mut EventReceiver,
    mut done: impl FnMut(&[PresentationEvent]) -> bool,
) -> Result<Vec<PresentationEvent>> {
    let mut seen = Vec::new();
    while !done(&seen) {
        let event = tokio::time::timeout(EVENT_TIMEOUT, receiver.recv())
            .await
            .map_err(|_| anyhow!("Timed out waiting for events, got {:?}", seen))?
            .ok_or_else(|| anyhow!("Event channel closed, got {:?}", seen))?;
        seen.push(event);
    }
    Ok(seen)
}

/// Receive events until one displays exactly `text`
pub async fn wait_for_text(receiver: &mut EventReceiver, text: &str) -> Result<Vec<PresentationEvent>> {
    wait_for(receiver, |events| {
        matches!(events.last(), Some(PresentationEvent::Display { text: shown, .. }) if shown == text)
    })
    .await
}

/// Shut the coordinator down and collect every remaining event
pub async fn finish(coordinator: GenerationCoordinator, mut receiver: EventReceiver) -> Vec<PresentationEvent> {
    tokio::time::timeout(EVENT_TIMEOUT, coordinator.shutdown())
        .await
        .expect("coordinator did not shut down");

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

/// Apply events to a fresh display buffer
pub fn render(events: &[PresentationEvent]) -> DisplayBuffer {
    let mut buffer = DisplayBuffer::new();
    for event in events {
        buffer.apply(event);
    }
    buffer
}

/// Displayed texts in order, with their append flag
pub fn displays(events: &[PresentationEvent]) -> Vec<(u64, String, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            PresentationEvent::Display { epoch, text, append } => Some((*epoch, text.clone(), *append)),
            PresentationEvent::Loading { .. } => None,
        })
        .collect()
}
