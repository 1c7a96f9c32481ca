//! Gate configuration.

use crate::classifier::{Classifier, DEFAULT_KNOWN_PREFIXES};
use crate::error::GateError;
use crate::facility::FacilityOccupancy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Largest accepted `event_buffer`.
pub const MAX_EVENT_BUFFER: usize = 65_536;

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse gate configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid gate configuration: {0}")]
    Invalid(#[from] GateError),
}

/// Configuration for a gate.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use gatekeep::GateConfig;
/// use std::time::Duration;
///
/// let config = GateConfig::from_json(r#"{"max_capacity": 120, "step_delay_ms": 500}"#).unwrap();
/// assert_eq!(config.max_capacity, 120);
/// assert_eq!(config.step_delay(), Duration::from_millis(500));
/// assert!(config.auto_advance);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Facility capacity (default: 50)
    pub max_capacity: u32,
    /// Vehicles already inside at start-up (default: 0)
    pub initial_occupancy: u32,
    /// Whether steps advance on a timer (default: true)
    pub auto_advance: bool,
    /// Delay between auto-advanced steps in milliseconds (default: 2000)
    pub step_delay_ms: u64,
    /// First plate characters treated as known visitors (default: B, D)
    pub known_visitor_prefixes: Vec<char>,
    /// Parking fee shown while waiting for payment (default: 5000)
    pub parking_fee: u32,
    /// Buffered notifications per subscriber before old ones are dropped (default: 64)
    pub event_buffer: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_capacity: 50,
            initial_occupancy: 0,
            auto_advance: true,
            step_delay_ms: 2000,
            known_visitor_prefixes: DEFAULT_KNOWN_PREFIXES.to_vec(),
            parking_fee: 5000,
            event_buffer: 64,
        }
    }
}

impl GateConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_capacity(mut self, max: u32) -> Self {
        self.max_capacity = max;
        self
    }

    pub fn with_initial_occupancy(mut self, current: u32) -> Self {
        self.initial_occupancy = current;
        self
    }

    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_known_visitor_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.known_visitor_prefixes = prefixes.into_iter().collect();
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Check the occupancy bounds and that the event buffer is within
    /// `1..=MAX_EVENT_BUFFER`.
    pub fn validate(&self) -> Result<(), GateError> {
        self.occupancy()?;
        if !(1..=MAX_EVENT_BUFFER).contains(&self.event_buffer) {
            return Err(GateError::OutOfRange {
                field: "event_buffer",
                value: u32::try_from(self.event_buffer).unwrap_or(u32::MAX),
                min: 1,
                max: MAX_EVENT_BUFFER as u32,
            });
        }
        Ok(())
    }

    pub(crate) fn occupancy(&self) -> Result<FacilityOccupancy, GateError> {
        FacilityOccupancy::new(self.max_capacity, self.initial_occupancy)
    }

    pub(crate) fn classifier(&self) -> Classifier {
        Classifier::new(self.known_visitor_prefixes.iter().copied())
    }
}
