//! Simulation State
//!
//! The single aggregate that owns everything a replication mutates: the
//! patient registry, staff pools, zone beds, wait queues and the future
//! event list (with the clock). Handlers receive it through the engine and
//! never reach for global state.
//!
//! # Critical Invariants
//!
//! 1. **Bounded pools**: `0 ≤ busy ≤ capacity` for nurses, doctors, specialists
//! 2. **Bounded beds**: `occupied ≤ capacity` per zone, and occupancy equals
//!    the number of live patients assigned to the zone
//! 3. **One place**: every live patient is in exactly one queue, buffer or
//!    service stage, matching its recorded location
//! 4. **No idle waiting**: a non-empty wait line implies its server pool is
//!    saturated (or, for beds, that every eligible zone is full)

use crate::allocation;
use crate::events::{EventKind, FutureEventList};
use crate::models::patient::{ArrivalMode, Bucket, Patient, PatientId, PatientLocation, Zone};
use crate::models::queues::WaitQueues;
use crate::models::resources::{ResourceKind, ResourcePool, ZoneBeds};
use crate::orchestrator::SimulationError;
use crate::stats::{QueueMetrics, ResourceMetrics};
use std::collections::HashMap;

/// Complete mutable state of one replication
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) patients: HashMap<PatientId, Patient>,
    next_patient_id: u64,
    pub(crate) nurses: ResourcePool,
    pub(crate) doctors: ResourcePool,
    pub(crate) specialists: ResourcePool,
    pub(crate) beds: ZoneBeds,
    pub(crate) queues: WaitQueues,
    pub(crate) fel: FutureEventList,
}

impl SimulationState {
    /// Create an empty department with the given capacities
    ///
    /// # Example
    ///
    /// ```rust
    /// use ed_simulator_core::SimulationState;
    ///
    /// let state = SimulationState::new(1, 2, 1, [14, 4, 6, 12]);
    /// assert_eq!(state.doctors().capacity(), 2);
    /// assert_eq!(state.num_patients(), 0);
    /// ```
    pub fn new(nurses: usize, doctors: usize, specialists: usize, zone_beds: [usize; 4]) -> Self {
        Self {
            patients: HashMap::new(),
            next_patient_id: 1,
            nurses: ResourcePool::new(ResourceKind::Nurse, nurses),
            doctors: ResourcePool::new(ResourceKind::Doctor, doctors),
            specialists: ResourcePool::new(ResourceKind::Specialist, specialists),
            beds: ZoneBeds::new(zone_beds),
            queues: WaitQueues::new(),
            fel: FutureEventList::new(),
        }
    }

    // ========================================================================
    // Patient registry
    // ========================================================================

    /// Register a new patient and return its id
    pub fn admit(&mut self, mode: ArrivalMode, time: f64) -> PatientId {
        let id = PatientId(self.next_patient_id);
        self.next_patient_id += 1;
        self.patients.insert(id, Patient::new(id, mode, time));
        id
    }

    pub fn patient(&self, id: PatientId) -> Result<&Patient, SimulationError> {
        self.patients
            .get(&id)
            .ok_or_else(|| SimulationError::InvariantViolation(format!("unknown patient {}", id)))
    }

    pub fn patient_mut(&mut self, id: PatientId) -> Result<&mut Patient, SimulationError> {
        self.patients
            .get_mut(&id)
            .ok_or_else(|| SimulationError::InvariantViolation(format!("unknown patient {}", id)))
    }

    /// Remove a departing patient from the registry
    pub fn remove_patient(&mut self, id: PatientId) -> Result<Patient, SimulationError> {
        self.patients
            .remove(&id)
            .ok_or_else(|| SimulationError::InvariantViolation(format!("unknown patient {}", id)))
    }

    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn nurses(&self) -> &ResourcePool {
        &self.nurses
    }

    pub fn doctors(&self) -> &ResourcePool {
        &self.doctors
    }

    pub fn specialists(&self) -> &ResourcePool {
        &self.specialists
    }

    pub fn beds(&self) -> &ZoneBeds {
        &self.beds
    }

    pub fn queues(&self) -> &WaitQueues {
        &self.queues
    }

    pub fn fel(&self) -> &FutureEventList {
        &self.fel
    }

    /// Queue lengths by statistics category
    ///
    /// Interrupt buffers are not part of the Workup category.
    pub fn queue_lengths(&self) -> QueueMetrics<usize> {
        QueueMetrics {
            triage: self.queues.triage.len(),
            bed: self.queues.bed.total_len(),
            workup: self.queues.workup.total_len(),
            specialist: self.queues.specialist.len(),
        }
    }

    /// Busy servers per resource
    pub fn busy_counts(&self) -> ResourceMetrics<usize> {
        ResourceMetrics {
            triage: self.nurses.busy(),
            workup: self.doctors.busy(),
            specialist: self.specialists.busy(),
        }
    }

    /// Server capacities per resource
    pub fn capacities(&self) -> ResourceMetrics<usize> {
        ResourceMetrics {
            triage: self.nurses.capacity(),
            workup: self.doctors.capacity(),
            specialist: self.specialists.capacity(),
        }
    }

    // ========================================================================
    // Invariant checking
    // ========================================================================

    /// Check every structural invariant of the state
    ///
    /// Cost is linear in the number of live patients and pending events;
    /// meant for tests and debugging, not called on the hot path.
    pub fn verify_invariants(&self) -> Result<(), SimulationError> {
        let violation = |msg: String| Err(SimulationError::InvariantViolation(msg));

        for pool in [&self.nurses, &self.doctors, &self.specialists] {
            if pool.busy() > pool.capacity() {
                return violation(format!(
                    "{:?} busy {} exceeds capacity {}",
                    pool.kind(),
                    pool.busy(),
                    pool.capacity()
                ));
            }
        }

        // Where each patient is found, from the queues and the pending events
        let mut found: HashMap<PatientId, PatientLocation> = HashMap::new();
        let mut place = |id: PatientId, loc: PatientLocation| -> Result<(), SimulationError> {
            if let Some(prev) = found.insert(id, loc) {
                return Err(SimulationError::InvariantViolation(format!(
                    "{} found in two places: {:?} and {:?}",
                    id, prev, loc
                )));
            }
            Ok(())
        };

        for id in &self.queues.triage {
            place(*id, PatientLocation::TriageQueue)?;
        }
        for id in &self.queues.specialist {
            place(*id, PatientLocation::SpecialistQueue)?;
        }
        for (bucket, id) in self.queues.bed.entries() {
            place(id, PatientLocation::BedQueue(bucket))?;
        }
        for (bucket, id) in self.queues.workup.entries() {
            place(id, PatientLocation::WorkupQueue(bucket))?;
        }
        for (bucket, id) in self.queues.interrupted.entries() {
            place(id, PatientLocation::Interrupted(bucket))?;
        }

        let mut in_service = (0usize, 0usize, 0usize);
        for event in self.fel.iter() {
            match event.kind() {
                EventKind::Arrival => {}
                EventKind::TriageDeparture(id) => {
                    in_service.0 += 1;
                    place(id, PatientLocation::InTriage)?;
                }
                EventKind::WorkupDeparture(id) => {
                    in_service.1 += 1;
                    place(id, PatientLocation::InWorkup)?;
                }
                EventKind::SpecialistDeparture(id) => {
                    in_service.2 += 1;
                    place(id, PatientLocation::WithSpecialist)?;
                }
            }
        }

        if in_service != (self.nurses.busy(), self.doctors.busy(), self.specialists.busy()) {
            return violation(format!(
                "in-service events {:?} disagree with busy counts ({}, {}, {})",
                in_service,
                self.nurses.busy(),
                self.doctors.busy(),
                self.specialists.busy()
            ));
        }

        if found.len() != self.patients.len() {
            return violation(format!(
                "{} patients placed but {} registered",
                found.len(),
                self.patients.len()
            ));
        }

        let mut zone_counts = [0usize; 4];
        for patient in self.patients.values() {
            match found.get(&patient.id()) {
                Some(loc) if *loc == patient.location() => {}
                Some(loc) => {
                    return violation(format!(
                        "{} recorded at {:?} but found at {:?}",
                        patient.id(),
                        patient.location(),
                        loc
                    ))
                }
                None => return violation(format!("{} is nowhere", patient.id())),
            }
            if let Some(zone) = patient.zone() {
                zone_counts[zone.index()] += 1;
            }
        }

        for zone in Zone::ALL {
            let occupied = self.beds.occupied(zone);
            if occupied > self.beds.capacity(zone) || occupied != zone_counts[zone.index()] {
                return violation(format!(
                    "{} occupancy {} (capacity {}) but {} patients assigned",
                    zone,
                    occupied,
                    self.beds.capacity(zone),
                    zone_counts[zone.index()]
                ));
            }
        }

        if !self.queues.triage.is_empty() && !self.nurses.is_saturated() {
            return violation("walk-ins queued while a nurse is free".to_string());
        }
        if !(self.queues.workup.is_empty() && self.queues.interrupted.is_empty())
            && !self.doctors.is_saturated()
        {
            return violation("patients waiting for workup while a doctor is free".to_string());
        }
        if !self.queues.specialist.is_empty() && !self.specialists.is_saturated() {
            return violation("patients queued while a specialist is free".to_string());
        }
        for bucket in Bucket::ALL {
            if self.queues.bed.len(bucket) > 0 {
                if let Some(zone) = self.beds.first_free(allocation::eligible_zones(bucket)) {
                    return violation(format!("{:?} waiting for a bed while {} has one", bucket, zone));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::SimTime;
    use crate::events::Event;

    #[test]
    fn test_new_state_is_consistent() {
        let state = SimulationState::new(1, 2, 1, [14, 4, 6, 12]);
        assert!(state.verify_invariants().is_ok());
        assert_eq!(state.busy_counts(), ResourceMetrics::default());
    }

    #[test]
    fn test_patient_in_two_places_is_detected() {
        let mut state = SimulationState::new(1, 2, 1, [1, 1, 1, 1]);
        let id = state.admit(ArrivalMode::WalkIn, 0.0);
        state.nurses.acquire().unwrap();
        state.patient_mut(id).unwrap().move_to(PatientLocation::InTriage);
        state
            .fel
            .schedule(Event::new(SimTime::new(1.0).unwrap(), EventKind::TriageDeparture(id)))
            .unwrap();
        assert!(state.verify_invariants().is_ok());

        state.queues.triage.push_back(id);
        assert!(state.verify_invariants().is_err());
    }

    #[test]
    fn test_unplaced_patient_is_detected() {
        let mut state = SimulationState::new(1, 2, 1, [1, 1, 1, 1]);
        state.admit(ArrivalMode::Ambulance, 0.0);
        assert!(state.verify_invariants().is_err());
    }

    #[test]
    fn test_unknown_patient_lookup_fails() {
        let state = SimulationState::new(1, 2, 1, [1, 1, 1, 1]);
        assert!(state.patient(PatientId(99)).is_err());
    }
}
