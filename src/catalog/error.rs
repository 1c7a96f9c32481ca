//! Catalog construction errors.

use crate::core::{EventTag, FlowId};
use thiserror::Error;

/// A single structural problem found while validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogViolation {
    #[error("Flow '{flow}' is not defined")]
    MissingFlow { flow: FlowId },

    #[error("Flow '{flow}' is defined more than once")]
    DuplicateFlow { flow: FlowId },

    #[error("Flow '{flow}' has no steps")]
    EmptyFlow { flow: FlowId },

    #[error("Flow '{flow}' must end with '{expected}', found '{found}'")]
    WrongTerminalTag {
        flow: FlowId,
        expected: EventTag,
        found: EventTag,
    },

    #[error("Flow '{flow}' has terminal tag '{tag}' at step {index} before its last step")]
    EarlyTerminal {
        flow: FlowId,
        index: usize,
        tag: EventTag,
    },

    #[error("Flow '{flow}' must return to Idle on its terminal step")]
    TerminalNotIdle { flow: FlowId },

    #[error("Flow '{flow}' enters Idle at step {index} before completing")]
    IdleBeforeTerminal { flow: FlowId, index: usize },

    #[error("Flow '{flow}' admits vehicles but has no passage step")]
    MissingPassage { flow: FlowId },

    #[error("Flow '{flow}' has {count} passage steps, expected at most one")]
    RepeatedPassage { flow: FlowId, count: usize },

    #[error("Reject flow '{flow}' must not contain a passage step")]
    PassageInRejectFlow { flow: FlowId },
}

/// Errors that can occur when building a flow catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Flow catalog is malformed ({} violation(s)): {}", .violations.len(), summary(.violations))]
    Malformed { violations: Vec<CatalogViolation> },
}

impl CatalogError {
    pub fn violations(&self) -> &[CatalogViolation] {
        match self {
            Self::Malformed { violations } => violations,
        }
    }
}

fn summary(violations: &[CatalogViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
