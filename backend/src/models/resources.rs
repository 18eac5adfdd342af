//! Resource pools and zone beds
//!
//! Fixed-capacity counters. Over-acquiring or over-releasing is a defect in
//! the allocation logic, so both are reported as invariant violations rather
//! than saturating.

use crate::models::patient::Zone;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};

/// Which staff pool a counter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Nurse,
    Doctor,
    Specialist,
}

/// Fixed-capacity counter of busy servers
///
/// # Example
/// ```
/// use ed_simulator_core::models::{ResourceKind, ResourcePool};
///
/// let mut doctors = ResourcePool::new(ResourceKind::Doctor, 2);
/// doctors.acquire().unwrap();
/// doctors.acquire().unwrap();
/// assert!(doctors.is_saturated());
/// assert!(doctors.acquire().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    kind: ResourceKind,
    capacity: usize,
    busy: usize,
}

impl ResourcePool {
    pub fn new(kind: ResourceKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            busy: 0,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn busy(&self) -> usize {
        self.busy
    }

    pub fn is_saturated(&self) -> bool {
        self.busy >= self.capacity
    }

    pub fn acquire(&mut self) -> Result<(), SimulationError> {
        if self.is_saturated() {
            return Err(SimulationError::InvariantViolation(format!(
                "{:?} pool over capacity ({} busy of {})",
                self.kind, self.busy, self.capacity
            )));
        }
        self.busy += 1;
        Ok(())
    }

    pub fn release(&mut self) -> Result<(), SimulationError> {
        if self.busy == 0 {
            return Err(SimulationError::InvariantViolation(format!(
                "{:?} pool released while idle",
                self.kind
            )));
        }
        self.busy -= 1;
        Ok(())
    }
}

/// Bed occupancy for the four zones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneBeds {
    capacity: [usize; 4],
    occupied: [usize; 4],
}

impl ZoneBeds {
    pub fn new(capacity: [usize; 4]) -> Self {
        Self {
            capacity,
            occupied: [0; 4],
        }
    }

    pub fn capacity(&self, zone: Zone) -> usize {
        self.capacity[zone.index()]
    }

    pub fn occupied(&self, zone: Zone) -> usize {
        self.occupied[zone.index()]
    }

    pub fn free(&self, zone: Zone) -> usize {
        self.capacity(zone) - self.occupied(zone)
    }

    pub fn has_free(&self, zone: Zone) -> bool {
        self.free(zone) > 0
    }

    /// First zone in `preference` order with a free bed
    pub fn first_free(&self, preference: &[Zone]) -> Option<Zone> {
        preference.iter().copied().find(|z| self.has_free(*z))
    }

    pub fn occupy(&mut self, zone: Zone) -> Result<(), SimulationError> {
        if !self.has_free(zone) {
            return Err(SimulationError::InvariantViolation(format!(
                "{} has no free bed ({} of {})",
                zone,
                self.occupied(zone),
                self.capacity(zone)
            )));
        }
        self.occupied[zone.index()] += 1;
        Ok(())
    }

    pub fn vacate(&mut self, zone: Zone) -> Result<(), SimulationError> {
        if self.occupied(zone) == 0 {
            return Err(SimulationError::InvariantViolation(format!(
                "{} vacated with no occupied bed",
                zone
            )));
        }
        self.occupied[zone.index()] -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_idle_pool_fails() {
        let mut nurses = ResourcePool::new(ResourceKind::Nurse, 1);
        assert!(nurses.release().is_err());
        assert_eq!(nurses.busy(), 0);
    }

    #[test]
    fn test_first_free_respects_preference_order() {
        let mut beds = ZoneBeds::new([1, 1, 1, 1]);
        beds.occupy(Zone::Three).unwrap();
        assert_eq!(beds.first_free(&[Zone::Three, Zone::Four]), Some(Zone::Four));
        beds.occupy(Zone::Four).unwrap();
        assert_eq!(beds.first_free(&[Zone::Three, Zone::Four]), None);
    }

    #[test]
    fn test_occupy_full_zone_fails() {
        let mut beds = ZoneBeds::new([0, 1, 1, 1]);
        assert!(beds.occupy(Zone::One).is_err());
        assert!(beds.vacate(Zone::Two).is_err());
    }
}
