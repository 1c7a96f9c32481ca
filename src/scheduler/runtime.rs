//! Scheduler backed by tokio timers.

use super::{Scheduler, TimerCallback, TimerHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Runs each callback in its own task after sleeping for the delay.
///
/// Cancellation aborts the sleeping task. A task that has already woken up
/// may still run its callback; the gate guards against that itself.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    next_id: Arc<AtomicU64>,
    tasks: Arc<Mutex<HashMap<u64, AbortHandle>>>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: Arc::new(AtomicU64::new(1)),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Use the runtime of the calling context, if there is one.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tasks = Arc::clone(&self.tasks);

        // Hold the map lock across spawn so the task cannot remove its entry
        // before it has been inserted.
        let mut guard = self.tasks.lock();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tasks.lock().remove(&id);
            callback();
        });
        guard.insert(id, task.abort_handle());

        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.tasks.lock().remove(&handle.0) {
            task.abort();
        }
    }
}
