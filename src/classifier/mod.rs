//! Flow selection for an arriving vehicle.
//!
//! Classification is a pure function of the plate, the member registry and
//! the current occupancy. Rules apply in strict precedence:
//!
//! 1. A full facility rejects everyone, VIPs included.
//! 2. A plate flagged by the [`PassbackCheck`] is rejected.
//! 3. VIPs take the VIP flow.
//! 4. Subscribers take the subscriber flow.
//! 5. Visitors whose plate starts with a recognized prefix are treated as
//!    known visitors; every other visitor takes the unknown-plate flow.

use crate::core::{FlowId, MemberCategory, PlateId};
use crate::facility::FacilityOccupancy;
use crate::registry::MemberRegistry;
use std::fmt;
use std::sync::Arc;

/// Plate prefixes treated as known visitors by default.
pub const DEFAULT_KNOWN_PREFIXES: [char; 2] = ['B', 'D'];

/// Extension point for anti-passback detection.
///
/// The gate has no anti-passback detector of its own; the default
/// [`NoPassbackCheck`] never flags a plate, which leaves
/// [`FlowId::RejectPassbackFlow`] unreachable until a real detector is
/// plugged in.
pub trait PassbackCheck: Send + Sync {
    /// Whether `plate` is attempting a passback (e.g. a second entry without exit).
    fn is_passback(&self, plate: &PlateId) -> bool;
}

/// Passback check that never flags a plate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPassbackCheck;

impl PassbackCheck for NoPassbackCheck {
    fn is_passback(&self, _plate: &PlateId) -> bool {
        false
    }
}

impl<F> PassbackCheck for F
where
    F: Fn(&PlateId) -> bool + Send + Sync,
{
    fn is_passback(&self, plate: &PlateId) -> bool {
        self(plate)
    }
}

/// Selects the member category and flow for a plate.
///
/// # Example
///
/// ```rust
/// use gatekeep::{Classifier, FacilityOccupancy, FlowId, MemberRoster, PlateId};
///
/// let classifier = Classifier::default();
/// let roster = MemberRoster::seeded();
/// let open = FacilityOccupancy::new(50, 0).unwrap();
/// let full = FacilityOccupancy::new(2, 2).unwrap();
///
/// let vip = PlateId::parse("B1234XX").unwrap();
/// assert_eq!(classifier.classify(&vip, &roster, &open), FlowId::VipFlow);
/// assert_eq!(classifier.classify(&vip, &roster, &full), FlowId::RejectCapacityFlow);
/// ```
#[derive(Clone)]
pub struct Classifier {
    known_prefixes: Vec<char>,
    passback: Arc<dyn PassbackCheck>,
}

impl Classifier {
    /// Create a classifier with the given known-visitor prefixes.
    ///
    /// Prefixes are compared case-insensitively against the plate's first
    /// character.
    pub fn new(known_prefixes: impl IntoIterator<Item = char>) -> Self {
        Self {
            known_prefixes: known_prefixes
                .into_iter()
                .flat_map(char::to_uppercase)
                .collect(),
            passback: Arc::new(NoPassbackCheck),
        }
    }

    /// Plug in an anti-passback detector.
    pub fn with_passback(mut self, check: impl PassbackCheck + 'static) -> Self {
        self.passback = Arc::new(check);
        self
    }

    pub fn known_prefixes(&self) -> &[char] {
        &self.known_prefixes
    }

    /// Member category of a plate. Independent of occupancy.
    pub fn categorize(&self, plate: &PlateId, registry: &dyn MemberRegistry) -> MemberCategory {
        registry.category_of(plate)
    }

    /// Whether an unregistered plate looks like a known visitor.
    pub fn is_known_visitor(&self, plate: &PlateId) -> bool {
        plate
            .initial()
            .is_some_and(|c| self.known_prefixes.contains(&c))
    }

    /// Select the flow for `plate`.
    pub fn classify(
        &self,
        plate: &PlateId,
        registry: &dyn MemberRegistry,
        occupancy: &FacilityOccupancy,
    ) -> FlowId {
        if occupancy.is_full() {
            return FlowId::RejectCapacityFlow;
        }
        if self.passback.is_passback(plate) {
            return FlowId::RejectPassbackFlow;
        }
        match self.categorize(plate, registry) {
            MemberCategory::Vip => FlowId::VipFlow,
            MemberCategory::Subscriber => FlowId::SubscriberFlow,
            MemberCategory::Visitor if self.is_known_visitor(plate) => FlowId::VisitorKnownFlow,
            MemberCategory::Visitor => FlowId::VisitorUnknownFlow,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_PREFIXES)
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("known_prefixes", &self.known_prefixes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemberRoster;

    fn plate(raw: &str) -> PlateId {
        PlateId::parse(raw).unwrap()
    }

    fn open() -> FacilityOccupancy {
        FacilityOccupancy::new(50, 0).unwrap()
    }

    #[test]
    fn capacity_dominates_membership() {
        let classifier = Classifier::default();
        let roster = MemberRoster::seeded();
        let full = FacilityOccupancy::new(2, 2).unwrap();

        for raw in ["B1234XX", "B2222AA", "D0001AA", "ZZ0000ZZ"] {
            assert_eq!(
                classifier.classify(&plate(raw), &roster, &full),
                FlowId::RejectCapacityFlow
            );
        }
    }

    #[test]
    fn members_get_their_flows() {
        let classifier = Classifier::default();
        let roster = MemberRoster::seeded();

        assert_eq!(
            classifier.classify(&plate("D9999ZZ"), &roster, &open()),
            FlowId::VipFlow
        );
        assert_eq!(
            classifier.classify(&plate("B3333BB"), &roster, &open()),
            FlowId::SubscriberFlow
        );
    }

    #[test]
    fn visitor_prefix_selects_known_flow() {
        let classifier = Classifier::default();
        let roster = MemberRoster::seeded();

        assert_eq!(
            classifier.classify(&plate("B0001QQ"), &roster, &open()),
            FlowId::VisitorKnownFlow
        );
        assert_eq!(
            classifier.classify(&plate("D0001QQ"), &roster, &open()),
            FlowId::VisitorKnownFlow
        );
        assert_eq!(
            classifier.classify(&plate("ZZ0000ZZ"), &roster, &open()),
            FlowId::VisitorUnknownFlow
        );
        assert_eq!(
            classifier.classify(&plate("H1234AB"), &roster, &open()),
            FlowId::VisitorUnknownFlow
        );
    }

    #[test]
    fn custom_prefixes_are_case_insensitive() {
        let classifier = Classifier::new(['h', 'K']);
        assert_eq!(classifier.known_prefixes(), &['H', 'K']);
        assert!(classifier.is_known_visitor(&plate("h77")));
        assert!(!classifier.is_known_visitor(&plate("B77")));
    }

    #[test]
    fn default_passback_check_never_fires() {
        let classifier = Classifier::default();
        let roster = MemberRoster::new();
        for raw in ["B1", "D2", "Z3"] {
            assert_ne!(
                classifier.classify(&plate(raw), &roster, &open()),
                FlowId::RejectPassbackFlow
            );
        }
    }

    #[test]
    fn plugged_passback_check_rejects_after_capacity() {
        let flagged = plate("B1234XX");
        let classifier = Classifier::default()
            .with_passback(move |p: &PlateId| *p == flagged);
        let roster = MemberRoster::seeded();

        assert_eq!(
            classifier.classify(&plate("B1234XX"), &roster, &open()),
            FlowId::RejectPassbackFlow
        );
        assert_eq!(
            classifier.classify(&plate("B5678YY"), &roster, &open()),
            FlowId::VipFlow
        );

        let full = FacilityOccupancy::new(1, 1).unwrap();
        assert_eq!(
            classifier.classify(&plate("B1234XX"), &roster, &full),
            FlowId::RejectCapacityFlow
        );
    }
}
