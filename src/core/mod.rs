//! Core gate vocabulary.
//!
//! This module contains the plain value types every other module speaks in:
//! - Plate identifiers and member categories
//! - Flow identifiers, gate states and event tags
//! - Immutable per-session step history
//!
//! Nothing in this module performs I/O or holds shared state.

mod category;
mod history;
mod plate;
mod state;
mod tag;

pub use category::{FlowId, MemberCategory};
pub use history::{SessionHistory, StepRecord};
pub use plate::PlateId;
pub use state::GateState;
pub use tag::EventTag;
