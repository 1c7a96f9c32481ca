//! Normalized license plate identifiers.

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trimmed, upper-cased, non-empty license plate.
///
/// The plate format itself is not validated; any non-blank text is a plate.
///
/// # Example
///
/// ```rust
/// use gatekeep::PlateId;
///
/// let plate = PlateId::parse("  b1234xx ").unwrap();
/// assert_eq!(plate.as_str(), "B1234XX");
/// assert!(PlateId::parse("   ").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlateId(String);

impl PlateId {
    /// Normalize raw operator input into a plate.
    pub fn parse(raw: &str) -> Result<Self, GateError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(GateError::invalid("license plate is empty"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character of the plate, used by the known-visitor heuristic.
    pub fn initial(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl FromStr for PlateId {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlateId {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlateId> for String {
    fn from(plate: PlateId) -> Self {
        plate.0
    }
}

impl AsRef<str> for PlateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
