//! Macros for writing flow tables as literals.

/// Build a [`Flow`](crate::catalog::Flow) from `State => Tag` pairs.
///
/// The flow is not validated until it is added to a catalog.
///
/// # Example
///
/// ```
/// use gatekeep::flow;
/// use gatekeep::core::{EventTag, FlowId, GateState};
///
/// let flow = flow!(FlowId::RejectPassbackFlow => [
///     Detected => AntiPassbackDetected,
///     Reject => AccessDenied,
///     Idle => ResetComplete,
/// ]);
///
/// assert_eq!(flow.len(), 3);
/// assert_eq!(flow.steps()[1].state, GateState::Reject);
/// assert_eq!(flow.terminal_tag(), Some(EventTag::ResetComplete));
/// ```
#[macro_export]
macro_rules! flow {
    (
        $id:expr => [
            $($state:ident => $tag:ident),+ $(,)?
        ]
    ) => {
        $crate::catalog::Flow::new(
            $id,
            vec![
                $(
                    $crate::catalog::TransitionStep::new(
                        $crate::core::GateState::$state,
                        $crate::core::EventTag::$tag,
                    )
                ),+
            ],
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{EventTag, FlowId, GateState};

    #[test]
    fn flow_macro_preserves_order() {
        let flow = flow!(FlowId::SubscriberFlow => [
            Detected => PlateRecognized,
            AuthCheck => SubscriberVerified,
            Idle => FlowComplete,
        ]);

        assert_eq!(flow.id(), FlowId::SubscriberFlow);
        let tags: Vec<EventTag> = flow.steps().iter().map(|s| s.tag).collect();
        assert_eq!(
            tags,
            vec![
                EventTag::PlateRecognized,
                EventTag::SubscriberVerified,
                EventTag::FlowComplete
            ]
        );
        assert_eq!(flow.steps()[2].state, GateState::Idle);
    }

    #[test]
    fn flow_macro_accepts_single_step() {
        let flow = flow!(FlowId::VipFlow => [Idle => FlowComplete]);
        assert_eq!(flow.len(), 1);
    }
}
