//! Shared gate handle with timer-driven auto-advance.
//!
//! [`Gate`] puts a [`GateController`] behind a lock and, while auto-advance
//! is on, schedules the next step after a fixed delay. Manual advances,
//! timer callbacks and admin operations all go through the same lock, so
//! they are applied one at a time.
//!
//! Every scheduled timer carries the session generation and step index it
//! was armed for. A timer that fires for anything other than the current
//! pending step is stale and does nothing, even if cancelling it came too
//! late.

use crate::checkpoint::GateCheckpoint;
use crate::config::GateConfig;
use crate::controller::{GateController, GateEvent, GateSnapshot, StepOutcome};
use crate::core::{FlowId, GateState, MemberCategory, PlateId};
use crate::error::GateError;
use crate::facility::FacilityOccupancy;
use crate::registry::{MemberRegistry, MemberRoster};
use crate::scheduler::{Scheduler, TimerHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// Identifies the step a timer was armed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AdvanceToken {
    generation: u64,
    step_index: usize,
}

struct PendingAdvance {
    token: AdvanceToken,
    handle: TimerHandle,
}

struct Inner {
    controller: GateController,
    auto_advance: bool,
    pending: Option<PendingAdvance>,
}

struct Shared {
    inner: Mutex<Inner>,
    scheduler: Arc<dyn Scheduler>,
    step_delay: Duration,
}

/// Cloneable, thread-safe handle to a gate.
///
/// # Example
///
/// ```rust
/// use gatekeep::{FlowId, Gate, GateConfig, GateState, ManualScheduler, MemberRoster};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let gate = Gate::new(&GateConfig::default(), MemberRoster::seeded(), scheduler.clone()).unwrap();
///
/// assert_eq!(gate.start_flow("B1234XX").unwrap(), FlowId::VipFlow);
/// assert_eq!(gate.state(), GateState::Detected);
///
/// scheduler.advance(Duration::from_secs(2));
/// assert_eq!(gate.state(), GateState::AuthCheck);
///
/// scheduler.run_until_idle();
/// assert!(!gate.is_active());
/// assert_eq!(gate.occupancy().current(), 1);
/// ```
#[derive(Clone)]
pub struct Gate {
    shared: Arc<Shared>,
}

impl Gate {
    pub fn new(
        config: &GateConfig,
        registry: impl MemberRegistry + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Result<Self, GateError> {
        let controller = GateController::new(config, registry)?;
        Ok(Self::from_controller(controller, config, scheduler))
    }

    /// Wrap an existing controller. Auto-advance settings come from `config`.
    pub fn from_controller(
        controller: GateController,
        config: &GateConfig,
        scheduler: impl Scheduler + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    controller,
                    auto_advance: config.auto_advance,
                    pending: None,
                }),
                scheduler: Arc::new(scheduler),
                step_delay: config.step_delay(),
            }),
        }
    }

    /// Rebuild an idle gate from a checkpoint.
    pub fn restore(
        config: &GateConfig,
        checkpoint: GateCheckpoint,
        scheduler: impl Scheduler + 'static,
    ) -> Result<Self, GateError> {
        let controller = GateController::from_checkpoint(config, checkpoint)?;
        Ok(Self::from_controller(controller, config, scheduler))
    }

    /// Begin a session for an arriving vehicle.
    ///
    /// With auto-advance on, the first step is applied straight away and the
    /// rest follow on the timer.
    pub fn start_flow(&self, plate: &str) -> Result<FlowId, GateError> {
        let mut inner = self.shared.inner.lock();
        let flow = inner.controller.start_flow(plate)?;
        if inner.auto_advance {
            self.advance_locked(&mut inner)?;
        }
        Ok(flow)
    }

    /// Apply the next step now. Any pending timer for the current step is
    /// cancelled and, with auto-advance on, a new one is armed for the next.
    pub fn advance_step(&self) -> Result<StepOutcome, GateError> {
        let mut inner = self.shared.inner.lock();
        self.advance_locked(&mut inner)
    }

    /// Abandon the active session and cancel any pending timer.
    pub fn reset(&self) -> Option<FlowId> {
        let mut inner = self.shared.inner.lock();
        self.cancel_pending(&mut inner);
        inner.controller.reset()
    }

    /// Turn auto-advance on or off. Turning it on mid-session arms a timer
    /// for the next step; turning it off cancels the pending one.
    pub fn set_auto_advance(&self, enabled: bool) {
        let mut inner = self.shared.inner.lock();
        inner.auto_advance = enabled;
        if !enabled {
            self.cancel_pending(&mut inner);
        } else if inner.pending.is_none() {
            self.schedule_next(&mut inner);
        }
        debug!(enabled, "Auto-advance toggled");
    }

    pub fn auto_advance(&self) -> bool {
        self.shared.inner.lock().auto_advance
    }

    /// Whether a timer is armed for the next step.
    pub fn has_pending_advance(&self) -> bool {
        self.shared.inner.lock().pending.is_some()
    }

    pub fn set_capacity(&self, max: u32) -> Result<(), GateError> {
        self.shared.inner.lock().controller.set_capacity(max)
    }

    pub fn set_occupancy(&self, current: u32) -> Result<(), GateError> {
        self.shared.inner.lock().controller.set_occupancy(current)
    }

    pub fn add_member(&self, plate: &str, category: MemberCategory) -> Result<PlateId, GateError> {
        self.shared.inner.lock().controller.add_member(plate, category)
    }

    pub fn remove_member(&self, plate: &str) -> Result<Option<MemberCategory>, GateError> {
        self.shared.inner.lock().controller.remove_member(plate)
    }

    pub fn members(&self, category: MemberCategory) -> Vec<PlateId> {
        self.shared.inner.lock().controller.members(category)
    }

    pub fn roster(&self) -> MemberRoster {
        self.shared.inner.lock().controller.roster()
    }

    pub fn state(&self) -> GateState {
        self.shared.inner.lock().controller.state()
    }

    pub fn is_active(&self) -> bool {
        self.shared.inner.lock().controller.is_active()
    }

    pub fn occupancy(&self) -> FacilityOccupancy {
        *self.shared.inner.lock().controller.occupancy()
    }

    pub fn snapshot(&self) -> GateSnapshot {
        self.shared.inner.lock().controller.snapshot()
    }

    pub fn checkpoint(&self) -> GateCheckpoint {
        self.shared.inner.lock().controller.checkpoint()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GateEvent> {
        self.shared.inner.lock().controller.subscribe()
    }

    /// Run `f` with the controller locked.
    pub fn with_controller<R>(&self, f: impl FnOnce(&GateController) -> R) -> R {
        f(&self.shared.inner.lock().controller)
    }

    fn advance_locked(&self, inner: &mut Inner) -> Result<StepOutcome, GateError> {
        self.cancel_pending(inner);
        let outcome = inner.controller.advance_step()?;
        if inner.auto_advance && !outcome.completed {
            self.schedule_next(inner);
        }
        Ok(outcome)
    }

    fn schedule_next(&self, inner: &mut Inner) {
        let Some((generation, step_index)) = inner.controller.cursor() else {
            return;
        };
        let token = AdvanceToken {
            generation,
            step_index,
        };
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let handle = self.shared.scheduler.after(
            self.shared.step_delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Gate { shared }.on_timer(token);
                }
            }),
        );
        debug!(generation, step_index, timer = handle.id(), "Armed auto-advance");
        inner.pending = Some(PendingAdvance { token, handle });
    }

    fn cancel_pending(&self, inner: &mut Inner) {
        if let Some(pending) = inner.pending.take() {
            self.shared.scheduler.cancel(pending.handle);
        }
    }

    fn on_timer(&self, token: AdvanceToken) {
        let mut inner = self.shared.inner.lock();
        let current = inner.controller.cursor().map(|(generation, step_index)| AdvanceToken {
            generation,
            step_index,
        });
        let armed = inner.pending.as_ref().map(|p| p.token);
        if armed != Some(token) || current != Some(token) {
            debug!(
                generation = token.generation,
                step_index = token.step_index,
                "Ignoring stale auto-advance timer"
            );
            return;
        }
        inner.pending = None;
        if let Err(err) = self.advance_locked(&mut inner) {
            debug!(error = %err, "Auto-advance found nothing to apply");
        }
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("Gate")
            .field("controller", &inner.controller)
            .field("auto_advance", &inner.auto_advance)
            .field("pending", &inner.pending.as_ref().map(|p| p.token))
            .field("step_delay", &self.shared.step_delay)
            .finish()
    }
}
