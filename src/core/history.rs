//! Per-session step history.
//!
//! Provides immutable tracking of the steps applied during one vehicle's
//! passage attempt.

use super::state::GateState;
use super::tag::EventTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied step.
///
/// # Example
///
/// ```rust
/// use gatekeep::core::{EventTag, GateState, StepRecord};
/// use chrono::Utc;
///
/// let record = StepRecord {
///     step: 1,
///     from: GateState::Idle,
///     to: GateState::Detected,
///     tag: EventTag::PlateRecognized,
///     at: Utc::now(),
/// };
/// assert_eq!(record.to, GateState::Detected);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based position of the step within its flow
    pub step: usize,
    /// The state being transitioned from
    pub from: GateState,
    /// The state being transitioned to
    pub to: GateState,
    /// Event tag of the applied step
    pub tag: EventTag,
    /// When the step was applied
    pub at: DateTime<Utc>,
}

/// Ordered history of the steps of one session.
///
/// History is immutable - the `record` method returns a new history
/// with the step added.
///
/// # Example
///
/// ```rust
/// use gatekeep::core::{EventTag, GateState, SessionHistory, StepRecord};
/// use chrono::Utc;
///
/// let history = SessionHistory::new();
/// let history = history.record(StepRecord {
///     step: 1,
///     from: GateState::Idle,
///     to: GateState::Detected,
///     tag: EventTag::PlateUnknown,
///     at: Utc::now(),
/// });
/// let history = history.record(StepRecord {
///     step: 2,
///     from: GateState::Detected,
///     to: GateState::WaitPayment,
///     tag: EventTag::PaymentProcessing,
///     at: Utc::now(),
/// });
///
/// assert_eq!(
///     history.path(),
///     vec![GateState::Idle, GateState::Detected, GateState::WaitPayment]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    steps: Vec<StepRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a step, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, record: StepRecord) -> Self {
        let mut steps = self.steps.clone();
        steps.push(record);
        Self { steps }
    }

    /// States visited in order: the starting state, then the target of each step.
    pub fn path(&self) -> Vec<GateState> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(first.from);
        }
        path.extend(self.steps.iter().map(|s| s.to));
        path
    }

    /// Tags applied in order.
    pub fn tags(&self) -> Vec<EventTag> {
        self.steps.iter().map(|s| s.tag).collect()
    }

    /// Time between the first and last recorded step.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.steps.first()?, self.steps.last()?);
        last.at.signed_duration_since(first.at).to_std().ok()
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
