//! Errors surfaced by gate operations.
//!
//! Every variant is a local, recoverable rejection of a single operation.
//! None of them leave the controller in a changed state.

use crate::core::{FlowId, PlateId};
use thiserror::Error;

/// Reasons a gate operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Gate is busy with vehicle '{active}'. Finish or reset the current session first")]
    SessionBusy { active: PlateId },

    #[error("No active session to advance")]
    NoActiveSession,

    /// The flow catalog has no entry for the selected flow
    #[error("Flow catalog has no {flow}")]
    MissingFlow { flow: FlowId },

    #[error("{field} of {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

impl GateError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
