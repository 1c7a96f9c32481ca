//! Flow catalog: the immutable table of transition sequences.
//!
//! A [`Flow`] is an ordered, acyclic chain of [`TransitionStep`]s. The
//! [`FlowCatalog`] maps every [`FlowId`] to exactly one flow and is
//! validated once, when it is built. A catalog that exists is well-formed:
//! every flow is non-empty, ends in a terminal step that returns the gate
//! to `Idle`, and admits at most one vehicle.

pub mod builder;
pub mod error;
pub mod macros;
mod standard;
mod validation;

pub use builder::CatalogBuilder;
pub use error::{CatalogError, CatalogViolation};

use crate::core::{EventTag, FlowId, GateState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One step of a flow: the state the gate moves to and the event it reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStep {
    pub state: GateState,
    pub tag: EventTag,
}

impl TransitionStep {
    pub const fn new(state: GateState, tag: EventTag) -> Self {
        Self { state, tag }
    }
}

/// An ordered sequence of steps, keyed by its flow identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    id: FlowId,
    steps: Vec<TransitionStep>,
}

impl Flow {
    /// Create an unvalidated flow. Validation happens when the flow is
    /// placed into a catalog.
    pub fn new(id: FlowId, steps: Vec<TransitionStep>) -> Self {
        Self { id, steps }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn steps(&self) -> &[TransitionStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&TransitionStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the passage step, if the flow admits a vehicle.
    pub fn passage_index(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.tag.is_passage())
    }

    /// Tag of the final step.
    pub fn terminal_tag(&self) -> Option<EventTag> {
        self.steps.last().map(|s| s.tag)
    }
}

/// Validated mapping from flow identifier to flow.
///
/// Flows are shared behind `Arc` so sessions can hold their flow without
/// copying it.
///
/// # Example
///
/// ```rust
/// use gatekeep::{FlowCatalog, FlowId, EventTag};
///
/// let catalog = FlowCatalog::standard();
/// let vip = catalog.get(FlowId::VipFlow).unwrap();
/// assert_eq!(vip.len(), 5);
/// assert_eq!(vip.terminal_tag(), Some(EventTag::FlowComplete));
/// ```
#[derive(Clone, Debug)]
pub struct FlowCatalog {
    flows: HashMap<FlowId, Arc<Flow>>,
}

impl FlowCatalog {
    /// The six flows the gate ships with.
    pub fn standard() -> Self {
        standard::flows()
            .into_iter()
            .fold(CatalogBuilder::new(), |builder, flow| builder.flow(flow))
            .build()
            .expect("Standard flow catalog should always validate")
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Look up a flow. A catalog built through [`CatalogBuilder`] has
    /// every identifier.
    pub fn get(&self, id: FlowId) -> Option<Arc<Flow>> {
        self.flows.get(&id).map(Arc::clone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flow> {
        FlowId::ALL
            .iter()
            .filter_map(|id| self.flows.get(id).map(|f| &**f))
    }

    pub(crate) fn from_validated(flows: HashMap<FlowId, Arc<Flow>>) -> Self {
        Self { flows }
    }
}

impl Default for FlowCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(flow: &Flow) -> Vec<GateState> {
        flow.steps().iter().map(|s| s.state).collect()
    }

    #[test]
    fn standard_catalog_defines_every_flow() {
        let catalog = FlowCatalog::standard();
        let ids: Vec<FlowId> = catalog.iter().map(|f| f.id()).collect();
        assert_eq!(ids, FlowId::ALL.to_vec());
    }

    #[test]
    fn vip_flow_matches_reference_sequence() {
        let vip = FlowCatalog::standard().get(FlowId::VipFlow).unwrap();
        assert_eq!(
            vip.steps(),
            &[
                TransitionStep::new(GateState::Detected, EventTag::PlateRecognized),
                TransitionStep::new(GateState::AuthCheck, EventTag::VipVerified),
                TransitionStep::new(GateState::OpenGate, EventTag::GateOpens),
                TransitionStep::new(GateState::Closed, EventTag::VehiclePasses),
                TransitionStep::new(GateState::Idle, EventTag::FlowComplete),
            ]
        );
    }

    #[test]
    fn unknown_visitor_skips_auth_check() {
        let flow = FlowCatalog::standard().get(FlowId::VisitorUnknownFlow).unwrap();
        assert_eq!(flow.steps()[0].tag, EventTag::PlateUnknown);
        assert!(!states(&flow).contains(&GateState::AuthCheck));
        assert_eq!(flow.len(), 6);
    }

    #[test]
    fn known_visitor_pays_after_auth_check() {
        let flow = FlowCatalog::standard().get(FlowId::VisitorKnownFlow).unwrap();
        assert_eq!(
            states(&flow),
            vec![
                GateState::Detected,
                GateState::AuthCheck,
                GateState::WaitPayment,
                GateState::Confirmation,
                GateState::OpenGate,
                GateState::Closed,
                GateState::Idle,
            ]
        );
    }

    #[test]
    fn reject_flows_never_admit() {
        let catalog = FlowCatalog::standard();
        for id in [FlowId::RejectCapacityFlow, FlowId::RejectPassbackFlow] {
            let flow = catalog.get(id).unwrap();
            assert_eq!(flow.passage_index(), None);
            assert_eq!(flow.terminal_tag(), Some(EventTag::ResetComplete));
            assert!(states(&flow).contains(&GateState::Reject));
        }
    }

    #[test]
    fn admitting_flows_pass_exactly_once_before_completion() {
        let catalog = FlowCatalog::standard();
        for flow in catalog.iter().filter(|f| !f.id().is_reject()) {
            let passage = flow.passage_index().unwrap();
            assert_eq!(passage, flow.len() - 2, "{}", flow.id());
            assert_eq!(flow.terminal_tag(), Some(EventTag::FlowComplete));
        }
    }

    #[test]
    fn no_flow_produces_reserved_state() {
        let catalog = FlowCatalog::standard();
        assert!(catalog
            .iter()
            .flat_map(|f| f.steps().iter())
            .all(|s| !s.state.is_reserved()));
    }

    #[test]
    fn get_shares_flow_storage() {
        let catalog = FlowCatalog::standard();
        let a = catalog.get(FlowId::SubscriberFlow).unwrap();
        let b = catalog.get(FlowId::SubscriberFlow).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn every_flow_is_present_in_a_built_catalog() {
        let catalog = FlowCatalog::standard();
        for id in FlowId::ALL {
            assert_eq!(catalog.get(id).map(|f| f.id()), Some(id));
        }
        assert!(FlowCatalog::from_validated(HashMap::new())
            .get(FlowId::VipFlow)
            .is_none());
    }
}
