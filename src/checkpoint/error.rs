//! Checkpoint error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading a gate checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    /// Malformed input, including an occupancy above capacity
    #[error("Failed to decode {format} checkpoint: {reason}")]
    Decode { format: &'static str, reason: String },

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Checkpoint file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
