//! Event tags attached to transition steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic label of a transition step.
///
/// Tags are labels for logs and displays. Two families carry meaning for the
/// controller: terminal tags end a session, and the passage tag admits a
/// vehicle into the facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    VehicleArrive,
    PlateRecognized,
    PlateUnknown,
    VipVerified,
    SubscriberVerified,
    PaymentRequired,
    PaymentProcessing,
    PaymentConfirmed,
    CapacityFull,
    AntiPassbackDetected,
    AccessDenied,
    GateOpens,
    VehiclePasses,
    FlowComplete,
    ResetComplete,
}

impl EventTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VehicleArrive => "vehicle_arrive",
            Self::PlateRecognized => "plate_recognized",
            Self::PlateUnknown => "plate_unknown",
            Self::VipVerified => "vip_verified",
            Self::SubscriberVerified => "subscriber_verified",
            Self::PaymentRequired => "payment_required",
            Self::PaymentProcessing => "payment_processing",
            Self::PaymentConfirmed => "payment_confirmed",
            Self::CapacityFull => "capacity_full",
            Self::AntiPassbackDetected => "anti_passback_detected",
            Self::AccessDenied => "access_denied",
            Self::GateOpens => "gate_opens",
            Self::VehiclePasses => "vehicle_passes",
            Self::FlowComplete => "flow_complete",
            Self::ResetComplete => "reset_complete",
        }
    }

    /// Title-cased label, e.g. `Vehicle Passes`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Terminal tags close the session in the step that applies them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FlowComplete | Self::ResetComplete)
    }

    /// The passage event admits one vehicle into the facility.
    pub fn is_passage(&self) -> bool {
        matches!(self, Self::VehiclePasses)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
