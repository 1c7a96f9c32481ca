//! Property-based tests for classification, occupancy and session stepping.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated plates and operation sequences.

use gatekeep::{
    Classifier, EventTag, FacilityOccupancy, FlowId, Gate, GateConfig, GateController, GateState,
    ManualScheduler, MemberCategory, MemberRegistry, MemberRoster, PlateId,
};
use proptest::prelude::*;

fn plate(raw: &str) -> PlateId {
    PlateId::parse(raw).unwrap()
}

fn seeded_plates() -> Vec<PlateId> {
    let roster = MemberRoster::seeded();
    let mut plates = roster.members(MemberCategory::Vip);
    plates.extend(roster.members(MemberCategory::Subscriber));
    plates
}

prop_compose! {
    fn arbitrary_plate()(raw in "[A-Za-z]{1,2}[0-9]{1,4}[A-Za-z]{0,3}") -> PlateId {
        plate(&raw)
    }
}

prop_compose! {
    /// A plate that is in neither member set.
    fn unregistered_plate()(plate in arbitrary_plate()
        .prop_filter("plate is a seeded member", |p| !seeded_plates().contains(p))) -> PlateId {
        plate
    }
}

prop_compose! {
    /// Either a seeded member or a random plate.
    fn any_plate()(
        member in prop::sample::select(seeded_plates()),
        other in arbitrary_plate(),
        pick_member in any::<bool>(),
    ) -> PlateId {
        if pick_member { member } else { other }
    }
}

prop_compose! {
    fn occupancy_below_max()(max in 1u32..200)(current in 0..max, max in Just(max)) -> FacilityOccupancy {
        FacilityOccupancy::new(max, current).unwrap()
    }
}

#[derive(Clone, Debug)]
enum Op {
    Arrive(PlateId),
    Advance,
    Reset,
    SetCapacity(u32),
    SetOccupancy(u32),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any_plate().prop_map(Op::Arrive),
        6 => Just(Op::Advance),
        1 => Just(Op::Reset),
        1 => (0u32..8).prop_map(Op::SetCapacity),
        1 => (0u32..8).prop_map(Op::SetOccupancy),
    ]
}

#[derive(Clone, Debug)]
enum RosterOp {
    Add(PlateId, MemberCategory),
    Remove(PlateId),
}

fn arbitrary_roster_op() -> impl Strategy<Value = RosterOp> {
    let category = prop_oneof![
        Just(MemberCategory::Vip),
        Just(MemberCategory::Subscriber),
        Just(MemberCategory::Visitor),
    ];
    prop_oneof![
        3 => (any_plate(), category).prop_map(|(p, c)| RosterOp::Add(p, c)),
        1 => any_plate().prop_map(RosterOp::Remove),
    ]
}

proptest! {
    #[test]
    fn unregistered_plates_are_visitors(plate in unregistered_plate(), occupancy in occupancy_below_max()) {
        let roster = MemberRoster::seeded();
        let classifier = Classifier::default();

        prop_assert_eq!(classifier.categorize(&plate, &roster), MemberCategory::Visitor);

        let known = matches!(plate.initial(), Some('B') | Some('D'));
        let expected = if known {
            FlowId::VisitorKnownFlow
        } else {
            FlowId::VisitorUnknownFlow
        };
        prop_assert_eq!(classifier.classify(&plate, &roster, &occupancy), expected);
    }

    #[test]
    fn full_facility_always_rejects(plate in any_plate(), max in 1u32..100) {
        let occupancy = FacilityOccupancy::new(max, max).unwrap();
        let flow = Classifier::default().classify(&plate, &MemberRoster::seeded(), &occupancy);
        prop_assert_eq!(flow, FlowId::RejectCapacityFlow);
    }

    #[test]
    fn member_sets_stay_disjoint(ops in prop::collection::vec(arbitrary_roster_op(), 1..40)) {
        let mut roster = MemberRoster::seeded();
        for op in ops {
            match op {
                RosterOp::Add(plate, category) => {
                    roster.add(plate.clone(), category);
                    prop_assert_eq!(roster.category_of(&plate), category);
                }
                RosterOp::Remove(plate) => {
                    roster.remove(&plate);
                    prop_assert_eq!(roster.category_of(&plate), MemberCategory::Visitor);
                }
            }
            let vip = roster.members(MemberCategory::Vip);
            let subscribers = roster.members(MemberCategory::Subscriber);
            prop_assert!(vip.iter().all(|p| !subscribers.contains(p)));
        }
    }

    #[test]
    fn completed_flow_changes_occupancy_by_its_kind(plate in any_plate(), max in 1u32..20, fill in 0u32..=20) {
        let current = fill.min(max);
        let config = GateConfig::default().with_max_capacity(max).with_initial_occupancy(current);
        let mut gate = GateController::new(&config, MemberRoster::seeded()).unwrap();

        let flow = gate.start_flow(plate.as_str()).unwrap();
        while gate.is_active() {
            gate.advance_step().unwrap();
        }

        let expected = if flow.is_reject() { current } else { current + 1 };
        prop_assert_eq!(gate.occupancy().current(), expected);
        prop_assert!(gate.occupancy().current() <= gate.occupancy().max());
    }

    #[test]
    fn advancing_visits_every_step_once(plate in any_plate(), fill in 0u32..=3) {
        let config = GateConfig::default().with_max_capacity(3).with_initial_occupancy(fill);
        let mut gate = GateController::new(&config, MemberRoster::seeded()).unwrap();
        let flow_id = gate.start_flow(plate.as_str()).unwrap();
        let flow = gate.catalog().get(flow_id).unwrap();

        let mut tags = Vec::new();
        for (i, step) in flow.steps().iter().enumerate() {
            prop_assert!(gate.is_active());
            let outcome = gate.advance_step().unwrap();
            prop_assert_eq!(outcome.tag, step.tag);
            prop_assert_eq!(outcome.completed, i + 1 == flow.len());
            tags.push(outcome.tag);
        }

        prop_assert!(!gate.is_active());
        prop_assert_eq!(gate.state(), GateState::Idle);
        prop_assert!(matches!(tags.last(), Some(EventTag::FlowComplete) | Some(EventTag::ResetComplete)));
        prop_assert!(gate.advance_step().is_err());
    }

    #[test]
    fn occupancy_stays_in_bounds(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let config = GateConfig::default().with_max_capacity(3);
        let mut gate = GateController::new(&config, MemberRoster::seeded()).unwrap();

        for op in ops {
            let before = *gate.occupancy();
            let result = match op {
                Op::Arrive(plate) => gate.start_flow(plate.as_str()).map(|_| ()),
                Op::Advance => gate.advance_step().map(|_| ()),
                Op::Reset => {
                    gate.reset();
                    Ok(())
                }
                Op::SetCapacity(max) => gate.set_capacity(max),
                Op::SetOccupancy(current) => gate.set_occupancy(current),
            };
            if result.is_err() {
                prop_assert_eq!(*gate.occupancy(), before);
            }
            let occupancy = gate.occupancy();
            prop_assert!(occupancy.max() >= 1);
            prop_assert!(occupancy.current() <= occupancy.max());
        }
    }

    #[test]
    fn reset_mid_flow_returns_to_idle(plate in any_plate(), steps in 0usize..4) {
        let scheduler = ManualScheduler::ignoring_cancel();
        let gate = Gate::new(&GateConfig::default(), MemberRoster::seeded(), scheduler.clone()).unwrap();

        gate.start_flow(plate.as_str()).unwrap();
        for _ in 0..steps {
            gate.advance_step().unwrap();
        }
        gate.reset();

        let snapshot = gate.snapshot();
        prop_assert_eq!(snapshot.state, GateState::Idle);
        prop_assert!(!snapshot.active);
        prop_assert_eq!(snapshot.step_index, 0);

        // Every timer armed before the reset fires, and none of them matter.
        scheduler.run_until_idle();
        prop_assert_eq!(gate.snapshot(), snapshot);
    }
}
