//! Read-only views of controller state for rendering.

use crate::core::{EventTag, FlowId, GateState, MemberCategory, PlateId};
use crate::facility::FacilityOccupancy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::session::Session;

/// Everything a presentation layer needs to draw the gate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GateSnapshot {
    pub state: GateState,
    /// Operator status line for the current state
    pub status: Option<String>,
    pub active: bool,
    pub step_index: usize,
    pub total_steps: usize,
    pub session: Option<SessionSnapshot>,
    pub occupancy: OccupancySnapshot,
    pub members: MemberCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub plate: PlateId,
    pub category: MemberCategory,
    pub flow: FlowId,
    pub step_index: usize,
    pub total_steps: usize,
    /// Tag of the step the next advance will apply
    pub next_tag: Option<EventTag>,
    pub progress: f64,
    pub started_at: DateTime<Utc>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            plate: session.plate().clone(),
            category: session.category(),
            flow: session.flow_id(),
            step_index: session.step_index(),
            total_steps: session.total_steps(),
            next_tag: session.next_tag(),
            progress: session.progress(),
            started_at: session.started_at(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OccupancySnapshot {
    pub current: u32,
    pub max: u32,
    pub available: u32,
    pub utilization: f64,
    pub full: bool,
}

impl OccupancySnapshot {
    /// `FULL` or `AVAILABLE`.
    pub fn status(&self) -> &'static str {
        if self.full {
            "FULL"
        } else {
            "AVAILABLE"
        }
    }
}

impl From<&FacilityOccupancy> for OccupancySnapshot {
    fn from(occupancy: &FacilityOccupancy) -> Self {
        Self {
            current: occupancy.current(),
            max: occupancy.max(),
            available: occupancy.available(),
            utilization: occupancy.utilization(),
            full: occupancy.is_full(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemberCounts {
    pub vip: usize,
    pub subscribers: usize,
}

impl MemberCounts {
    pub fn total(&self) -> usize {
        self.vip + self.subscribers
    }
}
