//! Cooperative per-frame tasks
//!
//! A [`FrameTask`] is resumed once per scheduled frame. Cancellation is
//! cooperative: the scheduler checks the task's [`CancellationToken`] before
//! every resumption and disposes cancelled tasks without resuming them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of resuming a frame task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Suspend until the next frame
    Pending,
    /// The task finished and can be dropped
    Complete,
}

/// A unit of work resumed once per frame
pub trait FrameTask: Send {
    /// Advance the task by one frame of `dt` seconds
    fn resume(&mut self, dt: f32) -> TaskStatus;
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    disposed: AtomicBool,
}

/// Shared cancellation flag for a scheduled task
///
/// Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the task to stop at its next resumption
    pub fn request_cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Whether the scheduler has dropped the task
    pub fn is_disposed(&self) -> bool {
        self.state.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn dispose(&self) {
        self.state.disposed.store(true, Ordering::Release);
    }
}
