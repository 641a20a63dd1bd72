/*!
 * Generation epochs and the explicit stop flag.
 *
 * The coordinator's submission path is the only writer; streaming tasks
 * read both values between chunks to find out whether they may keep
 * emitting output.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Epoch counter plus stop flag shared between submitter and worker
#[derive(Debug, Default)]
pub struct GenerationState {
    /// Epoch of the most recent request
    epoch: AtomicU64,

    /// Set by `stop()` and by every submission, cleared when a task starts
    stop_requested: AtomicBool,
}

impl GenerationState {
    /// Create a state at epoch 0 with no stop requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch
    pub fn snapshot(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Start a new epoch and return it
    pub fn advance(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `epoch` is still the most recent one
    pub fn is_current(&self, epoch: u64) -> bool {
        self.snapshot() == epoch
    }

    /// Ask the streaming task to stop emitting
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Reset the stop flag before a task starts streaming
    pub fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::SeqCst);
    }

    /// Whether a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Token tying a task to `epoch`
    pub fn token(self: &Arc<Self>, epoch: u64) -> CancellationToken {
        CancellationToken {
            epoch,
            state: Arc::clone(self),
        }
    }
}

/// Read-only view a task uses to notice supersession or an explicit stop
#[derive(Debug, Clone)]
pub struct CancellationToken {
    epoch: u64,
    state: Arc<GenerationState>,
}

impl CancellationToken {
    /// Epoch the task was started for
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// A newer request has been submitted
    pub fn is_superseded(&self) -> bool {
        !self.state.is_current(self.epoch)
    }

    /// The task must stop emitting output
    pub fn is_cancelled(&self) -> bool {
        self.state.is_stop_requested() || self.is_superseded()
    }
}
