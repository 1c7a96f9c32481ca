//! Member categories and flow identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the gate treats a vehicle, derived from the member registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberCategory {
    Vip,
    Subscriber,
    Visitor,
}

impl MemberCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Subscriber => "SUBSCRIBER",
            Self::Visitor => "VISITOR",
        }
    }

    /// Whether the category is backed by a registry set.
    pub fn is_member(&self) -> bool {
        !matches!(self, Self::Visitor)
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of one of the predefined flows in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowId {
    VipFlow,
    SubscriberFlow,
    VisitorKnownFlow,
    VisitorUnknownFlow,
    RejectCapacityFlow,
    RejectPassbackFlow,
}

impl FlowId {
    /// Every flow a complete catalog must define.
    pub const ALL: [FlowId; 6] = [
        Self::VipFlow,
        Self::SubscriberFlow,
        Self::VisitorKnownFlow,
        Self::VisitorUnknownFlow,
        Self::RejectCapacityFlow,
        Self::RejectPassbackFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VipFlow => "vip_flow",
            Self::SubscriberFlow => "subscriber_flow",
            Self::VisitorKnownFlow => "visitor_known_flow",
            Self::VisitorUnknownFlow => "visitor_unknown_flow",
            Self::RejectCapacityFlow => "reject_capacity_flow",
            Self::RejectPassbackFlow => "reject_passback_flow",
        }
    }

    /// Reject flows end in denial and never admit a vehicle.
    pub fn is_reject(&self) -> bool {
        matches!(self, Self::RejectCapacityFlow | Self::RejectPassbackFlow)
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
