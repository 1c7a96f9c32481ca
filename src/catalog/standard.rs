//! The standard flow table.

use super::Flow;
use crate::core::FlowId;
use crate::flow;

pub(super) fn flows() -> Vec<Flow> {
    vec![
        flow!(FlowId::VipFlow => [
            Detected => PlateRecognized,
            AuthCheck => VipVerified,
            OpenGate => GateOpens,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]),
        flow!(FlowId::SubscriberFlow => [
            Detected => PlateRecognized,
            AuthCheck => SubscriberVerified,
            OpenGate => GateOpens,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]),
        flow!(FlowId::VisitorKnownFlow => [
            Detected => PlateRecognized,
            AuthCheck => PaymentRequired,
            WaitPayment => PaymentProcessing,
            Confirmation => PaymentConfirmed,
            OpenGate => GateOpens,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]),
        flow!(FlowId::VisitorUnknownFlow => [
            Detected => PlateUnknown,
            WaitPayment => PaymentProcessing,
            Confirmation => PaymentConfirmed,
            OpenGate => GateOpens,
            Closed => VehiclePasses,
            Idle => FlowComplete,
        ]),
        flow!(FlowId::RejectCapacityFlow => [
            Detected => PlateRecognized,
            AuthCheck => CapacityFull,
            Reject => AccessDenied,
            Idle => ResetComplete,
        ]),
        flow!(FlowId::RejectPassbackFlow => [
            Detected => AntiPassbackDetected,
            Reject => AccessDenied,
            Idle => ResetComplete,
        ]),
    ]
}
