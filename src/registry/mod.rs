//! Member registry: which plates are VIPs and which are subscribers.
//!
//! The engine only needs the capability described by [`MemberRegistry`].
//! [`MemberRoster`] is the in-memory implementation and [`RosterStore`]
//! persists it as a two-list JSON document.

mod roster;
mod store;

pub use roster::MemberRoster;
pub use store::{RosterError, RosterStore};

use crate::core::{MemberCategory, PlateId};

/// Capability consumed by the gate to look up and manage members.
///
/// Implementations must keep the VIP and subscriber sets disjoint: adding a
/// plate to one category removes it from the other.
pub trait MemberRegistry: Send {
    /// Whether `plate` is registered under `category`.
    ///
    /// For [`MemberCategory::Visitor`] this is true when the plate is in
    /// neither member set.
    fn contains(&self, plate: &PlateId, category: MemberCategory) -> bool;

    /// Register `plate` under `category`, moving it out of the other set.
    ///
    /// Adding as [`MemberCategory::Visitor`] drops any membership.
    fn add(&mut self, plate: PlateId, category: MemberCategory);

    /// Remove `plate` from whichever set holds it, returning that category.
    fn remove(&mut self, plate: &PlateId) -> Option<MemberCategory>;

    /// Plates registered under `category`, sorted.
    fn members(&self, category: MemberCategory) -> Vec<PlateId>;

    /// Category of `plate`. VIP takes precedence over subscriber.
    fn category_of(&self, plate: &PlateId) -> MemberCategory {
        if self.contains(plate, MemberCategory::Vip) {
            MemberCategory::Vip
        } else if self.contains(plate, MemberCategory::Subscriber) {
            MemberCategory::Subscriber
        } else {
            MemberCategory::Visitor
        }
    }

    /// Number of plates registered under `category`.
    fn count(&self, category: MemberCategory) -> usize {
        self.members(category).len()
    }
}
