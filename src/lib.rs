//! Gatekeep: the control engine of an automated vehicle access gate.
//!
//! Gatekeep decides, for an arriving vehicle, which authorization path
//! applies, steps that path through a fixed sequence of gate states, and
//! keeps the occupancy count of a bounded facility consistent.
//!
//! # Core Concepts
//!
//! - **Flow Catalog**: immutable, validated table of transition sequences
//! - **Classifier**: pure selection of a flow from plate, members and occupancy
//! - **Controller**: single-session state machine that applies one step at a time
//! - **Gate**: lock-guarded shared handle that adds cancellable auto-advance timers
//!
//! # Example
//!
//! ```rust
//! use gatekeep::{FlowId, GateConfig, GateController, GateState, MemberRoster};
//!
//! let config = GateConfig::default();
//! let mut gate = GateController::new(&config, MemberRoster::seeded()).unwrap();
//!
//! let flow = gate.start_flow("d9999zz").unwrap();
//! assert_eq!(flow, FlowId::VipFlow);
//!
//! let first = gate.advance_step().unwrap();
//! assert_eq!(first.state, GateState::Detected);
//!
//! while gate.is_active() {
//!     gate.advance_step().unwrap();
//! }
//! assert_eq!(gate.occupancy().current(), 1);
//! ```

pub mod catalog;
pub mod checkpoint;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod facility;
pub mod gate;
pub mod registry;
pub mod scheduler;

// Re-export commonly used types
pub use catalog::{Flow, FlowCatalog, TransitionStep};
pub use classifier::{Classifier, NoPassbackCheck, PassbackCheck};
pub use config::GateConfig;
pub use controller::{GateController, GateEvent, GateEventKind, GateSnapshot, StepOutcome};
pub use core::{EventTag, FlowId, GateState, MemberCategory, PlateId};
pub use error::GateError;
pub use facility::FacilityOccupancy;
pub use gate::Gate;
pub use registry::{MemberRegistry, MemberRoster, RosterStore};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
