//! JSON persistence for the member roster.

use super::MemberRoster;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while reading or writing a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to access roster file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Roster file '{}' is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed store for a [`MemberRoster`].
///
/// The file holds two sorted lists, `vip` and `subscribers`.
#[derive(Clone, Debug)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the roster, returning `None` if the file does not exist.
    pub fn read(&self) -> Result<Option<MemberRoster>, RosterError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RosterError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| RosterError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Load the roster, falling back to the seeded roster.
    ///
    /// A missing file is created with the seeded members. An unreadable or
    /// corrupt file is left untouched.
    pub fn load_or_seed(&self) -> MemberRoster {
        match self.read() {
            Ok(Some(roster)) => {
                info!(
                    path = %self.path.display(),
                    members = roster.total(),
                    "Loaded member roster"
                );
                roster
            }
            Ok(None) => {
                let roster = MemberRoster::seeded();
                if let Err(err) = self.save(&roster) {
                    warn!(error = %err, "Failed to write seeded member roster");
                } else {
                    info!(path = %self.path.display(), "Created seeded member roster");
                }
                roster
            }
            Err(err) => {
                warn!(error = %err, "Falling back to seeded member roster");
                MemberRoster::seeded()
            }
        }
    }

    /// Write the roster as pretty-printed JSON.
    pub fn save(&self, roster: &MemberRoster) -> Result<(), RosterError> {
        let json = serde_json::to_string_pretty(roster).map_err(|source| RosterError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| RosterError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
