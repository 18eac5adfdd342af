//! Patient model
//!
//! A patient enters on arrival, walks through triage (walk-ins only), a bed
//! in one of the four zones, the doctor workup and optionally the specialist,
//! and leaves the registry when it departs the department.
//!
//! Triage classes run from 1 (most urgent) to 5 (least urgent). Every queue
//! that is split by urgency uses the same three [`Bucket`]s.

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, monotonically assigned patient identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pt_{:06}", self.0)
    }
}

/// How the patient reached the department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalMode {
    Ambulance,
    WalkIn,
}

/// Triage class, 1 (most urgent) through 5 (least urgent)
///
/// Ordering follows the number: a *larger* class is a *lower* priority.
///
/// # Example
/// ```
/// use ed_simulator_core::models::{Bucket, TriageClass};
///
/// let c = TriageClass::new(4).unwrap();
/// assert_eq!(c.bucket(), Bucket::Class345);
/// assert!(TriageClass::new(6).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TriageClass(u8);

impl TriageClass {
    pub const ONE: TriageClass = TriageClass(1);
    pub const TWO: TriageClass = TriageClass(2);
    pub const THREE: TriageClass = TriageClass(3);
    pub const FOUR: TriageClass = TriageClass(4);
    pub const FIVE: TriageClass = TriageClass(5);

    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(TriageClass(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based index for per-class config tables
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Eligibility bucket shared by the bed, workup and interrupt queues
    pub fn bucket(self) -> Bucket {
        match self.0 {
            1 => Bucket::Class1,
            2 => Bucket::Class2,
            _ => Bucket::Class345,
        }
    }

    /// Classes 1 and 2 may preempt a doctor from a less urgent patient
    pub fn can_preempt(self) -> bool {
        self.0 <= 2
    }
}

impl fmt::Display for TriageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class{}", self.0)
    }
}

/// Closed set of eligibility buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Class1,
    Class2,
    Class345,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Class1, Bucket::Class2, Bucket::Class345];

    pub fn index(self) -> usize {
        match self {
            Bucket::Class1 => 0,
            Bucket::Class2 => 1,
            Bucket::Class345 => 2,
        }
    }
}

/// Ward area with its own bed capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    One,
    Two,
    Three,
    Four,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::One, Zone::Two, Zone::Three, Zone::Four];

    pub fn index(self) -> usize {
        match self {
            Zone::One => 0,
            Zone::Two => 1,
            Zone::Three => 2,
            Zone::Four => 3,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone{}", self.number())
    }
}

/// The single place a live patient currently occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientLocation {
    /// Created, not yet routed (only observable inside a handler)
    Arriving,
    TriageQueue,
    InTriage,
    BedQueue(Bucket),
    WorkupQueue(Bucket),
    InWorkup,
    Interrupted(Bucket),
    SpecialistQueue,
    WithSpecialist,
}

/// A patient record in the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    arrival_mode: ArrivalMode,
    triage_class: Option<TriageClass>,
    zone: Option<Zone>,
    arrival_time: f64,
    location: PatientLocation,
}

impl Patient {
    /// Create a patient at arrival; walk-ins are created unclassified
    pub fn new(id: PatientId, arrival_mode: ArrivalMode, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_mode,
            triage_class: None,
            zone: None,
            arrival_time,
            location: PatientLocation::Arriving,
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn arrival_mode(&self) -> ArrivalMode {
        self.arrival_mode
    }

    pub fn triage_class(&self) -> Option<TriageClass> {
        self.triage_class
    }

    /// Triage class, or an invariant violation if not classified yet
    pub fn require_class(&self) -> Result<TriageClass, SimulationError> {
        self.triage_class.ok_or_else(|| {
            SimulationError::InvariantViolation(format!("{} has no triage class", self.id))
        })
    }

    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    /// Assigned zone, or an invariant violation if no bed was granted
    pub fn require_zone(&self) -> Result<Zone, SimulationError> {
        self.zone.ok_or_else(|| {
            SimulationError::InvariantViolation(format!("{} holds no bed", self.id))
        })
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn location(&self) -> PatientLocation {
        self.location
    }

    /// Set the triage class; a patient is classified exactly once
    pub fn classify(&mut self, class: TriageClass) -> Result<(), SimulationError> {
        if let Some(existing) = self.triage_class {
            return Err(SimulationError::InvariantViolation(format!(
                "{} already classified as {}",
                self.id, existing
            )));
        }
        self.triage_class = Some(class);
        Ok(())
    }

    /// Record the bed granted to this patient
    pub fn assign_zone(&mut self, zone: Zone) -> Result<(), SimulationError> {
        if let Some(existing) = self.zone {
            return Err(SimulationError::InvariantViolation(format!(
                "{} already holds a bed in {}",
                self.id, existing
            )));
        }
        self.zone = Some(zone);
        Ok(())
    }

    pub fn move_to(&mut self, location: PatientLocation) {
        self.location = location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_mapping() {
        assert_eq!(TriageClass::ONE.bucket(), Bucket::Class1);
        assert_eq!(TriageClass::TWO.bucket(), Bucket::Class2);
        assert_eq!(TriageClass::THREE.bucket(), Bucket::Class345);
        assert_eq!(TriageClass::FIVE.bucket(), Bucket::Class345);
    }

    #[test]
    fn test_class_ordering_is_numeric() {
        assert!(TriageClass::THREE > TriageClass::ONE);
        assert!(TriageClass::ONE.can_preempt());
        assert!(!TriageClass::THREE.can_preempt());
    }

    #[test]
    fn test_classify_twice_is_rejected() {
        let mut p = Patient::new(PatientId(1), ArrivalMode::WalkIn, 0.0);
        p.classify(TriageClass::FOUR).unwrap();
        assert!(p.classify(TriageClass::FIVE).is_err());
    }

    #[test]
    fn test_zone_numbers() {
        let numbers: Vec<u8> = Zone::ALL.iter().map(|z| z.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
}
