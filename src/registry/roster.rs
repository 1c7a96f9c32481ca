//! In-memory member roster.

use super::MemberRegistry;
use crate::core::{MemberCategory, PlateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const SEED_VIP: [&str; 3] = ["B1234XX", "B5678YY", "D9999ZZ"];
const SEED_SUBSCRIBERS: [&str; 3] = ["B2222AA", "B3333BB", "B4444CC"];

/// Two disjoint, sorted sets of member plates.
///
/// Serializes as `{"vip": [...], "subscribers": [...]}`. On deserialization a
/// plate listed in both sets is kept as VIP only.
///
/// # Example
///
/// ```rust
/// use gatekeep::{MemberCategory, MemberRegistry, MemberRoster, PlateId};
///
/// let mut roster = MemberRoster::new();
/// let plate = PlateId::parse("b7777qq").unwrap();
///
/// roster.add(plate.clone(), MemberCategory::Subscriber);
/// roster.add(plate.clone(), MemberCategory::Vip);
///
/// assert_eq!(roster.category_of(&plate), MemberCategory::Vip);
/// assert!(!roster.contains(&plate, MemberCategory::Subscriber));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RosterLists")]
pub struct MemberRoster {
    vip: BTreeSet<PlateId>,
    subscribers: BTreeSet<PlateId>,
}

#[derive(Deserialize)]
struct RosterLists {
    #[serde(default)]
    vip: Vec<PlateId>,
    #[serde(default)]
    subscribers: Vec<PlateId>,
}

impl From<RosterLists> for MemberRoster {
    fn from(lists: RosterLists) -> Self {
        Self::from_lists(lists.vip, lists.subscribers)
    }
}

impl MemberRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The roster a fresh installation starts with.
    pub fn seeded() -> Self {
        let parse = |raw: &[&str]| -> Vec<PlateId> {
            raw.iter().filter_map(|p| PlateId::parse(p).ok()).collect()
        };
        Self::from_lists(parse(&SEED_VIP), parse(&SEED_SUBSCRIBERS))
    }

    /// Build a roster from two lists, resolving overlap in favour of VIP.
    pub fn from_lists(
        vip: impl IntoIterator<Item = PlateId>,
        subscribers: impl IntoIterator<Item = PlateId>,
    ) -> Self {
        let vip: BTreeSet<PlateId> = vip.into_iter().collect();
        let subscribers = subscribers
            .into_iter()
            .filter(|p| !vip.contains(p))
            .collect();
        Self { vip, subscribers }
    }

    /// First member of a category in sorted order, handy as a sample plate.
    pub fn first(&self, category: MemberCategory) -> Option<&PlateId> {
        self.set(category).and_then(|set| set.iter().next())
    }

    pub fn total(&self) -> usize {
        self.vip.len() + self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn set(&self, category: MemberCategory) -> Option<&BTreeSet<PlateId>> {
        match category {
            MemberCategory::Vip => Some(&self.vip),
            MemberCategory::Subscriber => Some(&self.subscribers),
            MemberCategory::Visitor => None,
        }
    }
}

impl MemberRegistry for MemberRoster {
    fn contains(&self, plate: &PlateId, category: MemberCategory) -> bool {
        match category {
            MemberCategory::Vip => self.vip.contains(plate),
            MemberCategory::Subscriber => self.subscribers.contains(plate),
            MemberCategory::Visitor => {
                !self.vip.contains(plate) && !self.subscribers.contains(plate)
            }
        }
    }

    fn add(&mut self, plate: PlateId, category: MemberCategory) {
        match category {
            MemberCategory::Vip => {
                self.subscribers.remove(&plate);
                self.vip.insert(plate);
            }
            MemberCategory::Subscriber => {
                self.vip.remove(&plate);
                self.subscribers.insert(plate);
            }
            MemberCategory::Visitor => {
                self.remove(&plate);
            }
        }
    }

    fn remove(&mut self, plate: &PlateId) -> Option<MemberCategory> {
        if self.vip.remove(plate) {
            Some(MemberCategory::Vip)
        } else if self.subscribers.remove(plate) {
            Some(MemberCategory::Subscriber)
        } else {
            None
        }
    }

    fn members(&self, category: MemberCategory) -> Vec<PlateId> {
        self.set(category)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn count(&self, category: MemberCategory) -> usize {
        self.set(category).map_or(0, BTreeSet::len)
    }
}
