//! Clock and timer abstractions used by [`ExpiringCache`](super::ExpiringCache).
//!
//! Production code uses tokio's clock and spawns one sleeping task per
//! scheduled eviction. Tests can substitute manual implementations to drive
//! expiry without waiting on wall-clock time.

use std::time::Duration;
use tokio::time::Instant;

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Runs a task once after a delay.
pub trait Scheduler: Send + Sync + 'static {
    /// Schedule `task` to run after `delay`. The returned handle cancels it.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TimerHandle;
}

/// Cancellation handle for a scheduled task.
///
/// Dropping the handle does not cancel the task; call [`TimerHandle::cancel`].
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle for a task that was never scheduled.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Tokio's clock; honours `tokio::time::pause` in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Schedules tasks on the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TimerHandle {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let join = handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task();
                });
                let abort = join.abort_handle();
                TimerHandle::new(move || abort.abort())
            }
            Err(_) => {
                // Entries still expire lazily on read.
                tracing::warn!("No tokio runtime available, eviction timer not scheduled");
                TimerHandle::noop()
            }
        }
    }
}
