//! Facility occupancy: a counter bounded by the facility's capacity.

use crate::error::GateError;
use serde::{Deserialize, Serialize};

/// Occupancy of a bounded facility.
///
/// `0 <= current <= max` and `max > 0` hold for every value of this type;
/// setters that would break the bound are rejected without changing anything.
///
/// # Example
///
/// ```rust
/// use gatekeep::FacilityOccupancy;
///
/// let mut lot = FacilityOccupancy::new(2, 1).unwrap();
/// assert!(lot.admit());
/// assert!(lot.is_full());
/// assert!(!lot.admit());
/// assert_eq!(lot.current(), 2);
///
/// assert!(lot.set_capacity(1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOccupancy")]
pub struct FacilityOccupancy {
    current: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawOccupancy {
    current: u32,
    max: u32,
}

impl TryFrom<RawOccupancy> for FacilityOccupancy {
    type Error = GateError;

    fn try_from(raw: RawOccupancy) -> Result<Self, Self::Error> {
        Self::new(raw.max, raw.current)
    }
}

impl FacilityOccupancy {
    pub fn new(max: u32, current: u32) -> Result<Self, GateError> {
        check_capacity(max, 0)?;
        check_occupancy(max, current)?;
        Ok(Self { current, max })
    }

    /// An empty facility with room for `max` vehicles.
    pub fn empty(max: u32) -> Result<Self, GateError> {
        Self::new(max, 0)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn available(&self) -> u32 {
        self.max - self.current
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Occupancy as a percentage of capacity.
    pub fn utilization(&self) -> f64 {
        f64::from(self.current) / f64::from(self.max) * 100.0
    }

    /// Change the capacity. It must stay above zero and not drop below the
    /// vehicles already inside.
    pub fn set_capacity(&mut self, max: u32) -> Result<(), GateError> {
        check_capacity(max, self.current)?;
        self.max = max;
        Ok(())
    }

    /// Override the vehicle count. It must not exceed capacity.
    pub fn set_occupancy(&mut self, current: u32) -> Result<(), GateError> {
        check_occupancy(self.max, current)?;
        self.current = current;
        Ok(())
    }

    /// Count one vehicle in. Returns `false` if the facility was already full,
    /// in which case the count stays at capacity.
    pub fn admit(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.current += 1;
        true
    }
}

fn check_capacity(max: u32, current: u32) -> Result<(), GateError> {
    let min = current.max(1);
    if max < min {
        return Err(GateError::OutOfRange {
            field: "capacity",
            value: max,
            min,
            max: u32::MAX,
        });
    }
    Ok(())
}

fn check_occupancy(max: u32, current: u32) -> Result<(), GateError> {
    if current > max {
        return Err(GateError::OutOfRange {
            field: "occupancy",
            value: current,
            min: 0,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_enforces_bounds() {
        assert!(FacilityOccupancy::new(50, 0).is_ok());
        assert!(FacilityOccupancy::new(50, 50).is_ok());
        assert!(matches!(
            FacilityOccupancy::new(0, 0),
            Err(GateError::OutOfRange {
                field: "capacity",
                ..
            })
        ));
        assert!(FacilityOccupancy::new(10, 11).is_err());
    }

    #[test]
    fn occupancy_above_capacity_names_occupancy() {
        assert_eq!(
            FacilityOccupancy::new(5, 6),
            Err(GateError::OutOfRange {
                field: "occupancy",
                value: 6,
                min: 0,
                max: 5,
            })
        );
    }

    #[test]
    fn admit_stops_at_capacity() {
        let mut lot = FacilityOccupancy::empty(2).unwrap();
        assert!(lot.admit());
        assert!(lot.admit());
        assert!(!lot.admit());
        assert_eq!(lot.current(), 2);
        assert_eq!(lot.available(), 0);
    }

    #[test]
    fn capacity_cannot_drop_below_current() {
        let mut lot = FacilityOccupancy::new(10, 6).unwrap();
        let err = lot.set_capacity(5).unwrap_err();
        assert_eq!(
            err,
            GateError::OutOfRange {
                field: "capacity",
                value: 5,
                min: 6,
                max: u32::MAX,
            }
        );
        assert_eq!(lot.max(), 10);

        lot.set_capacity(6).unwrap();
        assert!(lot.is_full());
    }

    #[test]
    fn occupancy_override_is_bounded() {
        let mut lot = FacilityOccupancy::empty(20).unwrap();
        lot.set_occupancy(20).unwrap();
        assert!(lot.set_occupancy(21).is_err());
        assert_eq!(lot.current(), 20);
        lot.set_occupancy(0).unwrap();
        assert_eq!(lot.current(), 0);
    }

    #[test]
    fn utilization_is_a_percentage() {
        let lot = FacilityOccupancy::new(50, 40).unwrap();
        assert!((lot.utilization() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialization_validates_bounds() {
        let ok: FacilityOccupancy = serde_json::from_str(r#"{"current": 3, "max": 5}"#).unwrap();
        assert_eq!(ok.current(), 3);

        let bad = serde_json::from_str::<FacilityOccupancy>(r#"{"current": 6, "max": 5}"#)
            .unwrap_err();
        assert!(bad.to_string().contains("occupancy of 6 is out of range"));
    }
}
