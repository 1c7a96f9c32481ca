//! Checkpoint and resume for the durable part of a gate.
//!
//! A checkpoint carries facility occupancy and the member roster. It never
//! carries an in-flight session: a restored gate always starts idle, so a
//! vehicle half way through a flow at shutdown has to be presented again.

use crate::facility::FacilityOccupancy;
use crate::registry::MemberRoster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of gate state.
///
/// # Example
///
/// ```rust
/// use gatekeep::checkpoint::GateCheckpoint;
/// use gatekeep::{FacilityOccupancy, MemberRoster};
///
/// let occupancy = FacilityOccupancy::new(50, 12).unwrap();
/// let checkpoint = GateCheckpoint::new(occupancy, MemberRoster::seeded());
///
/// let bytes = checkpoint.to_bytes().unwrap();
/// let restored = GateCheckpoint::from_bytes(&bytes).unwrap();
/// assert_eq!(restored.occupancy.current(), 12);
/// assert_eq!(restored.roster, MemberRoster::seeded());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub taken_at: DateTime<Utc>,

    pub occupancy: FacilityOccupancy,

    pub roster: MemberRoster,
}

impl GateCheckpoint {
    pub fn new(occupancy: FacilityOccupancy, roster: MemberRoster) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            occupancy,
            roster,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// Parse a JSON checkpoint, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            format: "json",
            reason: e.to_string(),
        })?;
        checkpoint.check_version()
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            format: "bincode",
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            format: "bincode",
            reason: e.to_string(),
        })?;
        checkpoint.check_version()
    }

    /// Write the JSON form to `path`, going through a temporary file so a
    /// crash never leaves a half-written checkpoint behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let temp = path.with_extension("tmp");
        fs::write(&temp, json).map_err(|source| CheckpointError::Io {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), id = %self.id, "Saved gate checkpoint");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn check_version(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }
}
