//! Cancellable delayed callbacks.
//!
//! The gate schedules its auto-advance steps through a [`Scheduler`]. Two
//! implementations ship with the crate:
//!
//! - [`TokioScheduler`] sleeps on a tokio runtime
//! - [`ManualScheduler`] keeps a virtual clock that tests advance by hand

mod manual;
mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

use std::time::Duration;

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a scheduled callback so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Clock/scheduler capability consumed by the gate.
///
/// Implementations must never run `callback` synchronously inside
/// [`Scheduler::after`]; the gate calls `after` while holding its lock.
pub trait Scheduler: Send + Sync {
    /// Run `callback` once, after `delay`.
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a scheduled callback. Cancelling a timer that already fired
    /// or was already cancelled does nothing.
    fn cancel(&self, handle: TimerHandle);
}
