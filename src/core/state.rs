//! Fixed gate states.
//!
//! States describe where the physical gate is in its cycle. They carry no
//! control logic of their own; flows decide the order they are visited in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of gate states.
///
/// `ErrorTimeout` is reserved: presentation layers know how to show it, but
/// no flow in the standard catalog produces it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateState {
    #[default]
    Idle,
    Detected,
    AuthCheck,
    WaitPayment,
    Confirmation,
    OpenGate,
    Closed,
    Reject,
    ErrorTimeout,
}

impl GateState {
    /// Get the state's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Detected => "Detected",
            Self::AuthCheck => "AuthCheck",
            Self::WaitPayment => "WaitPayment",
            Self::Confirmation => "Confirmation",
            Self::OpenGate => "OpenGate",
            Self::Closed => "Closed",
            Self::Reject => "Reject",
            Self::ErrorTimeout => "ErrorTimeout",
        }
    }

    /// Whether the barrier arm is raised in this state.
    pub fn is_barrier_open(&self) -> bool {
        matches!(self, Self::OpenGate | Self::Closed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Reject | Self::ErrorTimeout)
    }

    /// Reserved states have no producing transition in the standard catalog.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::ErrorTimeout)
    }

    /// Operator-facing status line, if the state has one.
    ///
    /// `fee` is the parking fee shown while waiting for payment.
    pub fn status_message(&self, fee: u32) -> Option<String> {
        let message = match self {
            Self::Detected => "VEHICLE DETECTED - SCANNING PLATE".to_string(),
            Self::AuthCheck => "CHECKING AUTHORIZATION".to_string(),
            Self::WaitPayment => format!("PAYMENT REQUIRED - RP {}", group_thousands(fee)),
            Self::Confirmation => "PAYMENT CONFIRMED".to_string(),
            Self::OpenGate => "OPENING GATE".to_string(),
            Self::Closed => "VEHICLE PASSING THROUGH".to_string(),
            Self::Reject => "ACCESS DENIED".to_string(),
            Self::ErrorTimeout => "TIMEOUT - OPERATOR ATTENTION REQUIRED".to_string(),
            Self::Idle => return None,
        };
        Some(message)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
