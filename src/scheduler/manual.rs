//! Deterministic scheduler driven by a virtual clock.

use super::{Scheduler, TimerCallback, TimerHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

struct PendingTimer {
    id: u64,
    due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Scheduler whose clock only moves when [`ManualScheduler::advance`] is called.
///
/// Callbacks run on the caller's thread, in due order, with the scheduler
/// unlocked so they may schedule further timers.
///
/// # Example
///
/// ```rust
/// use gatekeep::scheduler::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
///
/// scheduler.after(Duration::from_secs(2), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
/// assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone)]
pub struct ManualScheduler {
    clock: Arc<Mutex<Clock>>,
    honor_cancel: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            clock: Arc::default(),
            honor_cancel: true,
        }
    }

    /// A scheduler whose `cancel` is ignored, so every timer eventually
    /// fires. Models a timer that was already in flight when it was cancelled.
    pub fn ignoring_cancel() -> Self {
        Self {
            clock: Arc::default(),
            honor_cancel: false,
        }
    }

    /// Virtual time elapsed so far.
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.clock.lock().pending.len()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    ///
    /// Timers scheduled by a callback fire in the same call if they fall
    /// due within the window. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;
        while let Some(callback) = self.take_due(target) {
            callback();
            fired += 1;
        }
        self.clock.lock().now = target;
        fired
    }

    /// Fire the earliest pending timer regardless of its due time.
    pub fn fire_next(&self) -> bool {
        let next = {
            let clock = self.clock.lock();
            clock.pending.iter().map(|t| t.due).min()
        };
        match next.and_then(|due| self.take_due(due)) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fire timers until none remain. Returns the number of callbacks run.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while self.fire_next() {
            fired += 1;
        }
        fired
    }

    fn take_due(&self, target: Duration) -> Option<TimerCallback> {
        let mut clock = self.clock.lock();
        let index = clock
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= target)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = clock.pending.remove(index);
        clock.now = clock.now.max(timer.due);
        Some(timer.callback)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut clock = self.clock.lock();
        clock.next_id += 1;
        let id = clock.next_id;
        let due = clock.now + delay;
        clock.pending.push(PendingTimer { id, due, callback });
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if self.honor_cancel {
            self.clock.lock().pending.retain(|t| t.id != handle.0);
        }
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.pending.len())
            .field("honor_cancel", &self.honor_cancel)
            .finish()
    }
}
