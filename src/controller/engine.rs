//! Single-session controller that applies flows one step at a time.

use crate::catalog::FlowCatalog;
use crate::checkpoint::GateCheckpoint;
use crate::classifier::Classifier;
use crate::config::GateConfig;
use crate::core::{EventTag, FlowId, GateState, MemberCategory, PlateId};
use crate::error::GateError;
use crate::facility::FacilityOccupancy;
use crate::registry::{MemberRegistry, MemberRoster};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::event::{GateEvent, GateEventKind};
use super::session::Session;
use super::snapshot::{GateSnapshot, MemberCounts, OccupancySnapshot, SessionSnapshot};

/// Result of applying a single step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// State the gate is in after the step
    pub state: GateState,

    /// Tag of the step that was applied
    pub tag: EventTag,

    /// Index of the next step, or 0 once the flow completed
    pub step_index: usize,

    pub total_steps: usize,

    /// Whether the step ended the session
    pub completed: bool,
}

/// The gate's control engine.
///
/// Holds at most one active session. Every operation either applies fully
/// or is rejected with a [`GateError`] and leaves everything unchanged.
/// Each state change is published as a [`GateEvent`] to subscribers.
///
/// The controller is synchronous and knows nothing about time. Auto-advance
/// lives in [`Gate`](crate::Gate), which wraps a controller behind a lock.
pub struct GateController {
    catalog: FlowCatalog,
    classifier: Classifier,
    registry: Box<dyn MemberRegistry>,
    occupancy: FacilityOccupancy,
    session: Option<Session>,
    generation: u64,
    parking_fee: u32,
    events: broadcast::Sender<GateEvent>,
}

impl GateController {
    /// Create an idle controller from configuration and a member registry.
    pub fn new(
        config: &GateConfig,
        registry: impl MemberRegistry + 'static,
    ) -> Result<Self, GateError> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_buffer);
        Ok(Self {
            catalog: FlowCatalog::standard(),
            classifier: config.classifier(),
            registry: Box::new(registry),
            occupancy: config.occupancy()?,
            session: None,
            generation: 0,
            parking_fee: config.parking_fee,
            events,
        })
    }

    /// Rebuild an idle controller from a checkpoint. Occupancy and members
    /// come from the checkpoint; everything else from `config`.
    pub fn from_checkpoint(
        config: &GateConfig,
        checkpoint: GateCheckpoint,
    ) -> Result<Self, GateError> {
        let mut controller = Self::new(config, checkpoint.roster)?;
        controller.occupancy = checkpoint.occupancy;
        info!(
            checkpoint = %checkpoint.id,
            current = controller.occupancy.current(),
            max = controller.occupancy.max(),
            "Restored gate from checkpoint"
        );
        Ok(controller)
    }

    /// Replace the flow catalog.
    pub fn with_catalog(mut self, catalog: FlowCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the classifier, e.g. to plug in a passback check.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Receive every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GateEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn registry(&self) -> &dyn MemberRegistry {
        &*self.registry
    }

    pub fn occupancy(&self) -> &FacilityOccupancy {
        &self.occupancy
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Current gate state; idle when no session is active.
    pub fn state(&self) -> GateState {
        self.session.as_ref().map_or(GateState::Idle, Session::state)
    }

    /// `(generation, step_index)` of the active session.
    pub(crate) fn cursor(&self) -> Option<(u64, usize)> {
        self.session
            .as_ref()
            .map(|s| (s.generation(), s.step_index()))
    }

    /// Begin a session for an arriving vehicle.
    ///
    /// The flow is chosen from membership and occupancy at this moment and
    /// does not change for the rest of the session. No step is applied yet.
    pub fn start_flow(&mut self, plate: &str) -> Result<FlowId, GateError> {
        let plate = PlateId::parse(plate)?;
        if let Some(active) = &self.session {
            return Err(GateError::SessionBusy {
                active: active.plate().clone(),
            });
        }

        let category = self.classifier.categorize(&plate, &*self.registry);
        let flow_id = self
            .classifier
            .classify(&plate, &*self.registry, &self.occupancy);
        let flow = self
            .catalog
            .get(flow_id)
            .ok_or(GateError::MissingFlow { flow: flow_id })?;

        self.generation += 1;
        let session = Session::new(self.generation, plate.clone(), category, flow);
        let total_steps = session.total_steps();
        let id = session.id();
        self.session = Some(session);

        info!(
            session = %id,
            plate = %plate,
            category = %category,
            flow = %flow_id,
            "Vehicle arrived"
        );
        self.emit(
            Some(id),
            GateEventKind::FlowStarted {
                plate,
                category,
                flow: flow_id,
                tag: EventTag::VehicleArrive,
                total_steps,
            },
        );
        Ok(flow_id)
    }

    /// Apply the next step of the active flow.
    ///
    /// A `VehiclePasses` step counts the vehicle in. A terminal step ends the
    /// session and leaves the gate idle.
    pub fn advance_step(&mut self) -> Result<StepOutcome, GateError> {
        let session = self.session.as_mut().ok_or(GateError::NoActiveSession)?;
        let step = session.next_step().ok_or(GateError::NoActiveSession)?;
        let record = session.apply(step);
        let id = session.id();
        let total_steps = session.total_steps();
        let step_index = session.step_index();

        debug!(
            session = %id,
            step = record.step,
            total = total_steps,
            from = %record.from,
            to = %record.to,
            tag = %record.tag,
            "Applied step"
        );
        self.emit(
            Some(id),
            GateEventKind::StepApplied {
                step: record.step,
                total_steps,
                from: record.from,
                to: record.to,
                tag: record.tag,
            },
        );

        if step.tag.is_passage() {
            self.admit_vehicle(id);
        }

        if step.tag.is_terminal() {
            self.complete(step.tag);
            return Ok(StepOutcome {
                state: GateState::Idle,
                tag: step.tag,
                step_index: 0,
                total_steps,
                completed: true,
            });
        }

        Ok(StepOutcome {
            state: record.to,
            tag: step.tag,
            step_index,
            total_steps,
            completed: false,
        })
    }

    /// Abandon the active session, if any, and return to idle.
    ///
    /// Occupancy is left as it is. Returns the interrupted flow.
    pub fn reset(&mut self) -> Option<FlowId> {
        let interrupted = self.session.take();
        let flow = interrupted.as_ref().map(Session::flow_id);
        info!(
            flow = flow.map(|f| f.as_str()),
            "Gate reset"
        );
        self.emit(
            interrupted.as_ref().map(Session::id),
            GateEventKind::Reset { interrupted: flow },
        );
        flow
    }

    /// Change the facility capacity. Rejected if it would fall below the
    /// current occupancy or to zero.
    pub fn set_capacity(&mut self, max: u32) -> Result<(), GateError> {
        self.occupancy.set_capacity(max)?;
        info!(max, current = self.occupancy.current(), "Capacity changed");
        self.emit(
            None,
            GateEventKind::CapacityChanged {
                current: self.occupancy.current(),
                max,
            },
        );
        Ok(())
    }

    /// Override the occupancy count. Rejected if above capacity.
    pub fn set_occupancy(&mut self, current: u32) -> Result<(), GateError> {
        self.occupancy.set_occupancy(current)?;
        info!(current, max = self.occupancy.max(), "Occupancy overridden");
        self.emit(
            None,
            GateEventKind::OccupancySet {
                current,
                max: self.occupancy.max(),
            },
        );
        Ok(())
    }

    /// Register a VIP or subscriber plate. Adding moves a plate out of the
    /// other category. Applies to the next arrival, not the active session.
    pub fn add_member(
        &mut self,
        plate: &str,
        category: MemberCategory,
    ) -> Result<PlateId, GateError> {
        let plate = PlateId::parse(plate)?;
        if !category.is_member() {
            return Err(GateError::invalid(format!(
                "cannot register {plate} as {category}; remove the membership instead"
            )));
        }
        self.registry.add(plate.clone(), category);
        info!(plate = %plate, category = %category, "Member added");
        self.emit(
            None,
            GateEventKind::MemberAdded {
                plate: plate.clone(),
                category,
            },
        );
        Ok(plate)
    }

    /// Drop a plate's membership. Returns the category it had, if any.
    pub fn remove_member(&mut self, plate: &str) -> Result<Option<MemberCategory>, GateError> {
        let plate = PlateId::parse(plate)?;
        let removed = self.registry.remove(&plate);
        if let Some(category) = removed {
            info!(plate = %plate, category = %category, "Member removed");
            self.emit(None, GateEventKind::MemberRemoved { plate, category });
        }
        Ok(removed)
    }

    /// Sorted member plates of a category.
    pub fn members(&self, category: MemberCategory) -> Vec<PlateId> {
        self.registry.members(category)
    }

    /// Current roster as a standalone value.
    pub fn roster(&self) -> MemberRoster {
        MemberRoster::from_lists(
            self.registry.members(MemberCategory::Vip),
            self.registry.members(MemberCategory::Subscriber),
        )
    }

    /// Capture occupancy and members. Any active session is left out.
    pub fn checkpoint(&self) -> GateCheckpoint {
        if let Some(session) = &self.session {
            debug!(
                session = %session.id(),
                "Checkpoint taken mid-session; the session is not included"
            );
        }
        GateCheckpoint::new(self.occupancy, self.roster())
    }

    pub fn snapshot(&self) -> GateSnapshot {
        let state = self.state();
        let session = self.session.as_ref().map(SessionSnapshot::from);
        GateSnapshot {
            state,
            status: state.status_message(self.parking_fee),
            active: session.is_some(),
            step_index: session.as_ref().map_or(0, |s| s.step_index),
            total_steps: session.as_ref().map_or(0, |s| s.total_steps),
            session,
            occupancy: OccupancySnapshot::from(&self.occupancy),
            members: MemberCounts {
                vip: self.registry.count(MemberCategory::Vip),
                subscribers: self.registry.count(MemberCategory::Subscriber),
            },
        }
    }

    fn admit_vehicle(&mut self, session: Uuid) {
        if !self.occupancy.admit() {
            warn!(
                session = %session,
                max = self.occupancy.max(),
                "Vehicle passed a full facility; occupancy held at capacity"
            );
            return;
        }
        info!(
            session = %session,
            current = self.occupancy.current(),
            max = self.occupancy.max(),
            "Vehicle admitted"
        );
        self.emit(
            Some(session),
            GateEventKind::OccupancyChanged {
                current: self.occupancy.current(),
                max: self.occupancy.max(),
            },
        );
    }

    fn complete(&mut self, tag: EventTag) {
        let Some(session) = self.session.take() else {
            return;
        };
        let duration = session.history().duration();
        info!(
            session = %session.id(),
            plate = %session.plate(),
            flow = %session.flow_id(),
            tag = %tag,
            "Flow completed"
        );
        self.emit(
            Some(session.id()),
            GateEventKind::FlowCompleted {
                plate: session.plate().clone(),
                flow: session.flow_id(),
                tag,
                duration,
            },
        );
    }

    fn emit(&self, session: Option<Uuid>, kind: GateEventKind) {
        // No subscribers is not an error.
        let _ = self.events.send(GateEvent::now(session, kind));
    }
}

impl std::fmt::Debug for GateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateController")
            .field("state", &self.state())
            .field("session", &self.session)
            .field("occupancy", &self.occupancy)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}
