//! The gate controller: one session at a time, one step per advance.

mod engine;
mod event;
mod session;
mod snapshot;

pub use engine::{GateController, StepOutcome};
pub use event::{GateEvent, GateEventKind};
pub use session::Session;
pub use snapshot::{GateSnapshot, MemberCounts, OccupancySnapshot, SessionSnapshot};
