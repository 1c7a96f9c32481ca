//! Structural validation of flows and catalogs.
//!
//! Uses `Validation` so a malformed catalog reports every violation in one
//! pass instead of stopping at the first.

use super::error::CatalogViolation;
use super::Flow;
use crate::core::{EventTag, FlowId, GateState};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(super) type Checked = Validation<(), NonEmptyVec<CatalogViolation>>;

fn require(ok: bool, violation: impl FnOnce() -> CatalogViolation) -> Checked {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Validate a single flow against the terminal and passage rules.
pub(super) fn validate_flow(flow: &Flow) -> Checked {
    let id = flow.id();
    let steps = flow.steps();

    let Some(last) = steps.last() else {
        return Validation::fail(CatalogViolation::EmptyFlow { flow: id });
    };

    let expected_terminal = if id.is_reject() {
        EventTag::ResetComplete
    } else {
        EventTag::FlowComplete
    };

    let mut checks: Vec<Checked> = vec![
        require(last.tag == expected_terminal, || {
            CatalogViolation::WrongTerminalTag {
                flow: id,
                expected: expected_terminal,
                found: last.tag,
            }
        }),
        require(last.state == GateState::Idle, || {
            CatalogViolation::TerminalNotIdle { flow: id }
        }),
    ];

    let body = &steps[..steps.len() - 1];
    for (index, step) in body.iter().enumerate() {
        checks.push(require(!step.tag.is_terminal(), || {
            CatalogViolation::EarlyTerminal {
                flow: id,
                index,
                tag: step.tag,
            }
        }));
        checks.push(require(step.state != GateState::Idle, || {
            CatalogViolation::IdleBeforeTerminal { flow: id, index }
        }));
    }

    let passages = steps.iter().filter(|s| s.tag.is_passage()).count();
    if id.is_reject() {
        checks.push(require(passages == 0, || {
            CatalogViolation::PassageInRejectFlow { flow: id }
        }));
    } else {
        checks.push(require(passages > 0, || CatalogViolation::MissingPassage {
            flow: id,
        }));
        checks.push(require(passages <= 1, || {
            CatalogViolation::RepeatedPassage {
                flow: id,
                count: passages,
            }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Validate that the catalog is complete and every flow is well-formed.
pub(super) fn validate_catalog(flows: &[Flow]) -> Checked {
    let mut checks: Vec<Checked> = Vec::new();

    for id in FlowId::ALL {
        let count = flows.iter().filter(|f| f.id() == id).count();
        checks.push(require(count > 0, || CatalogViolation::MissingFlow { flow: id }));
        checks.push(require(count <= 1, || CatalogViolation::DuplicateFlow {
            flow: id,
        }));
    }

    checks.extend(flows.iter().map(validate_flow));

    Validation::all_vec(checks).map(|_| ())
}

pub(super) fn into_violations(errors: NonEmptyVec<CatalogViolation>) -> Vec<CatalogViolation> {
    errors.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow;

    fn failures(flow: &Flow) -> Vec<CatalogViolation> {
        match validate_flow(flow) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => into_violations(errors),
        }
    }

    #[test]
    fn well_formed_flow_passes() {
        let flow = flow!(FlowId::VipFlow => [
            Detected => PlateRecognized,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]);
        assert!(validate_flow(&flow).is_success());
    }

    #[test]
    fn empty_flow_is_rejected() {
        let flow = Flow::new(FlowId::VipFlow, Vec::new());
        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::EmptyFlow {
                flow: FlowId::VipFlow
            }]
        );
    }

    #[test]
    fn missing_terminal_accumulates_with_other_violations() {
        let flow = flow!(FlowId::SubscriberFlow => [
            Detected => PlateRecognized,
            OpenGate => GateOpens,
        ]);

        let violations = failures(&flow);
        assert!(violations.contains(&CatalogViolation::WrongTerminalTag {
            flow: FlowId::SubscriberFlow,
            expected: EventTag::FlowComplete,
            found: EventTag::GateOpens,
        }));
        assert!(violations.contains(&CatalogViolation::TerminalNotIdle {
            flow: FlowId::SubscriberFlow
        }));
        assert!(violations.contains(&CatalogViolation::MissingPassage {
            flow: FlowId::SubscriberFlow
        }));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn early_terminal_is_reported_with_index() {
        let flow = flow!(FlowId::RejectPassbackFlow => [
            Detected => AntiPassbackDetected,
            Reject => ResetComplete,
            Idle => ResetComplete,
        ]);

        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::EarlyTerminal {
                flow: FlowId::RejectPassbackFlow,
                index: 1,
                tag: EventTag::ResetComplete,
            }]
        );
    }

    #[test]
    fn reject_flow_must_not_admit() {
        let flow = flow!(FlowId::RejectCapacityFlow => [
            Detected => PlateRecognized,
            Closed => VehiclePasses,
            Idle => ResetComplete,
        ]);

        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::PassageInRejectFlow {
                flow: FlowId::RejectCapacityFlow
            }]
        );
    }

    #[test]
    fn reject_flow_must_end_with_reset() {
        let flow = flow!(FlowId::RejectCapacityFlow => [
            Reject => AccessDenied,
            Idle => FlowComplete,
        ]);

        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::WrongTerminalTag {
                flow: FlowId::RejectCapacityFlow,
                expected: EventTag::ResetComplete,
                found: EventTag::FlowComplete,
            }]
        );
    }

    #[test]
    fn repeated_passage_is_rejected() {
        let flow = flow!(FlowId::VisitorUnknownFlow => [
            Closed => VehiclePasses,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]);

        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::RepeatedPassage {
                flow: FlowId::VisitorUnknownFlow,
                count: 2,
            }]
        );
    }

    #[test]
    fn idle_inside_flow_is_rejected() {
        let flow = flow!(FlowId::VipFlow => [
            Idle => VehicleArrive,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]);

        assert_eq!(
            failures(&flow),
            vec![CatalogViolation::IdleBeforeTerminal {
                flow: FlowId::VipFlow,
                index: 0,
            }]
        );
    }
}
