//! The runtime record of one vehicle's passage attempt.

use crate::catalog::{Flow, TransitionStep};
use crate::core::{
    EventTag, FlowId, GateState, MemberCategory, PlateId, SessionHistory, StepRecord,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// One vehicle progressing through a flow.
///
/// A session only exists while it is active; finishing or resetting it
/// drops it and returns the gate to idle.
#[derive(Clone, Debug)]
pub struct Session {
    id: Uuid,
    generation: u64,
    plate: PlateId,
    category: MemberCategory,
    flow: Arc<Flow>,
    step_index: usize,
    state: GateState,
    history: SessionHistory,
    started_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(
        generation: u64,
        plate: PlateId,
        category: MemberCategory,
        flow: Arc<Flow>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation,
            plate,
            category,
            flow,
            step_index: 0,
            state: GateState::Idle,
            history: SessionHistory::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Monotonic counter distinguishing this session from every earlier one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plate(&self) -> &PlateId {
        &self.plate
    }

    pub fn category(&self) -> MemberCategory {
        self.category
    }

    pub fn flow_id(&self) -> FlowId {
        self.flow.id()
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Index of the next step to apply.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn total_steps(&self) -> usize {
        self.flow.len()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The step the next advance will apply.
    pub fn next_step(&self) -> Option<TransitionStep> {
        self.flow.step(self.step_index).copied()
    }

    pub fn next_tag(&self) -> Option<EventTag> {
        self.next_step().map(|s| s.tag)
    }

    /// Share of the flow already applied, as a percentage.
    pub fn progress(&self) -> f64 {
        if self.flow.is_empty() {
            return 0.0;
        }
        self.step_index as f64 / self.flow.len() as f64 * 100.0
    }

    /// Apply `step`: move to its state and record it. The step index moves
    /// on only for non-terminal steps; a terminal step ends the session.
    pub(crate) fn apply(&mut self, step: TransitionStep) -> StepRecord {
        let record = StepRecord {
            step: self.step_index + 1,
            from: self.state,
            to: step.state,
            tag: step.tag,
            at: Utc::now(),
        };
        self.state = step.state;
        self.history = self.history.record(record.clone());
        if !step.tag.is_terminal() {
            self.step_index += 1;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FlowCatalog;

    fn session(flow: FlowId) -> Session {
        Session::new(
            1,
            PlateId::parse("B1234XX").unwrap(),
            MemberCategory::Vip,
            FlowCatalog::standard().get(flow).unwrap(),
        )
    }

    #[test]
    fn new_session_starts_idle_at_step_zero() {
        let session = session(FlowId::VipFlow);
        assert_eq!(session.state(), GateState::Idle);
        assert_eq!(session.step_index(), 0);
        assert_eq!(session.total_steps(), 5);
        assert_eq!(session.next_tag(), Some(EventTag::PlateRecognized));
        assert!(session.history().is_empty());
    }

    #[test]
    fn apply_moves_state_and_index() {
        let mut session = session(FlowId::VipFlow);
        let step = session.next_step().unwrap();
        let record = session.apply(step);

        assert_eq!(record.step, 1);
        assert_eq!(record.from, GateState::Idle);
        assert_eq!(record.to, GateState::Detected);
        assert_eq!(session.state(), GateState::Detected);
        assert_eq!(session.step_index(), 1);
        assert!((session.progress() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn terminal_step_does_not_move_index() {
        let mut session = session(FlowId::RejectPassbackFlow);
        for _ in 0..2 {
            let step = session.next_step().unwrap();
            session.apply(step);
        }
        assert_eq!(session.step_index(), 2);

        let terminal = session.next_step().unwrap();
        assert!(terminal.tag.is_terminal());
        session.apply(terminal);
        assert_eq!(session.step_index(), 2);
        assert_eq!(session.state(), GateState::Idle);
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn sessions_have_distinct_ids() {
        assert_ne!(session(FlowId::VipFlow).id(), session(FlowId::VipFlow).id());
    }
}
