//! Human-readable notifications, one per state change.

use crate::core::{EventTag, FlowId, GateState, MemberCategory, PlateId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// A timestamped notification for the activity log.
///
/// `Display` renders the log line, e.g.
/// `[08:15:02] Step 2: Vip Verified (Detected -> AuthCheck)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GateEvent {
    pub at: DateTime<Utc>,
    /// Session the event belongs to, if any
    pub session: Option<Uuid>,
    pub kind: GateEventKind,
}

impl GateEvent {
    pub(crate) fn now(session: Option<Uuid>, kind: GateEventKind) -> Self {
        Self {
            at: Utc::now(),
            session,
            kind,
        }
    }
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GateEventKind {
    /// A vehicle arrived and a flow was selected for it
    FlowStarted {
        plate: PlateId,
        category: MemberCategory,
        flow: FlowId,
        tag: EventTag,
        total_steps: usize,
    },
    StepApplied {
        step: usize,
        total_steps: usize,
        from: GateState,
        to: GateState,
        tag: EventTag,
    },
    /// A vehicle passed the gate and was counted in
    OccupancyChanged { current: u32, max: u32 },
    FlowCompleted {
        plate: PlateId,
        flow: FlowId,
        tag: EventTag,
        duration: Option<Duration>,
    },
    Reset { interrupted: Option<FlowId> },
    CapacityChanged { current: u32, max: u32 },
    OccupancySet { current: u32, max: u32 },
    MemberAdded {
        plate: PlateId,
        category: MemberCategory,
    },
    MemberRemoved {
        plate: PlateId,
        category: MemberCategory,
    },
}

impl fmt::Display for GateEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlowStarted {
                plate,
                category,
                flow,
                ..
            } => write!(f, "Starting {flow} for {category}: {plate}"),
            Self::StepApplied {
                step,
                from,
                to,
                tag,
                ..
            } => write!(f, "Step {step}: {} ({from} -> {to})", tag.title()),
            Self::OccupancyChanged { current, max } => {
                write!(f, "Vehicle admitted, occupancy {current}/{max}")
            }
            Self::FlowCompleted { plate, tag, .. } if *tag == EventTag::ResetComplete => {
                write!(f, "Access denied for {plate} - system ready for next vehicle")
            }
            Self::FlowCompleted { .. } => {
                write!(f, "Flow completed - system ready for next vehicle")
            }
            Self::Reset {
                interrupted: Some(flow),
            } => write!(f, "System reset, {flow} interrupted"),
            Self::Reset { interrupted: None } => write!(f, "System reset"),
            Self::CapacityChanged { current, max } => {
                write!(f, "Parking capacity changed to {max} ({current} inside)")
            }
            Self::OccupancySet { current, max } => {
                write!(f, "Parking occupancy set to: {current}/{max}")
            }
            Self::MemberAdded { plate, category } => {
                write!(f, "Added {category} member: {plate}")
            }
            Self::MemberRemoved { plate, category } => {
                write!(f, "Removed {category} member: {plate}")
            }
        }
    }
}

impl fmt::Display for GateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.kind)
    }
}
