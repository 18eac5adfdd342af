//! Event handlers
//!
//! One method per event kind plus the allocation steps they share. Every
//! handler runs to completion at the current clock; the only cancellation
//! is preemption, which removes a pending workup departure from the FEL.
//!
//! Draws happen in a fixed order per event (see each handler), so a seed
//! and config reproduce a replication exactly.

use super::engine::{Simulation, SimulationError};
use crate::allocation::{self, INTERRUPT_DRAIN_ORDER, WORKUP_DRAIN_ORDER};
use crate::events::{Event, EventKind};
use crate::models::event::EventRecord;
use crate::models::patient::{ArrivalMode, PatientId, PatientLocation, TriageClass, Zone};
use crate::rng::VariateSource;
use log::trace;

impl<V: VariateSource> Simulation<V> {
    // ========================================================================
    // Arrival
    // ========================================================================

    /// Draws: interarrival gap, arrival mode, then (ambulance only) class.
    pub(super) fn handle_arrival(&mut self) -> Result<(), SimulationError> {
        let gap = self.config.arrivals.sample_interarrival(&mut self.variates)?;
        self.schedule_in(gap, EventKind::Arrival)?;

        let mode = self.config.arrivals.sample_mode(&mut self.variates)?;
        let now = self.now().minutes();
        let id = self.state.admit(mode, now);
        self.stats.record_admission();

        match mode {
            ArrivalMode::Ambulance => {
                let class = self
                    .config
                    .arrivals
                    .sample_ambulance_class(&mut self.variates)?;
                self.state.patient_mut(id)?.classify(class)?;
                trace!("{} arrives by ambulance as {}", id, class);
                self.route_to_bed(id, class, allocation::arrival_zones(class))
            }
            ArrivalMode::WalkIn => {
                trace!("{} walks in", id);
                self.request_triage(id)
            }
        }
    }

    // ========================================================================
    // Triage
    // ========================================================================

    fn request_triage(&mut self, id: PatientId) -> Result<(), SimulationError> {
        if self.state.nurses.is_saturated() {
            self.state.queues.triage.push_back(id);
            self.state
                .patient_mut(id)?
                .move_to(PatientLocation::TriageQueue);
            Ok(())
        } else {
            self.begin_triage(id)
        }
    }

    /// Draws: class, then triage duration.
    fn begin_triage(&mut self, id: PatientId) -> Result<(), SimulationError> {
        self.state.nurses.acquire()?;
        let class = self
            .config
            .arrivals
            .sample_walk_in_class(&mut self.variates)?;
        self.state.patient_mut(id)?.classify(class)?;
        let duration = self
            .config
            .service
            .sample_triage(class, &mut self.variates)?;
        self.schedule_in(duration, EventKind::TriageDeparture(id))?;
        self.state.patient_mut(id)?.move_to(PatientLocation::InTriage);
        Ok(())
    }

    pub(super) fn handle_triage_departure(&mut self, id: PatientId) -> Result<(), SimulationError> {
        self.state.nurses.release()?;

        let class = self.state.patient(id)?.require_class()?;
        self.route_to_bed(id, class, allocation::post_triage_zones())?;

        if let Some(next) = self.state.queues.triage.pop_front() {
            self.begin_triage(next)?;
        }
        Ok(())
    }

    // ========================================================================
    // Beds
    // ========================================================================

    /// Give the patient the first free zone in `preference`, or park it on
    /// the bed-wait line of its bucket.
    fn route_to_bed(
        &mut self,
        id: PatientId,
        class: TriageClass,
        preference: &[Zone],
    ) -> Result<(), SimulationError> {
        match self.state.beds.first_free(preference) {
            Some(zone) => {
                self.occupy_bed(id, zone)?;
                if class.can_preempt() {
                    self.start_urgent_workup(id, class)
                } else {
                    self.request_workup(id, class)
                }
            }
            None => {
                let bucket = class.bucket();
                self.state.queues.bed.push(bucket, id);
                self.state
                    .patient_mut(id)?
                    .move_to(PatientLocation::BedQueue(bucket));
                trace!("{} waits for a bed ({:?})", id, bucket);
                Ok(())
            }
        }
    }

    fn occupy_bed(&mut self, id: PatientId, zone: Zone) -> Result<(), SimulationError> {
        self.state.beds.occupy(zone)?;
        self.state.patient_mut(id)?.assign_zone(zone)?;
        trace!("{} takes a bed in {}", id, zone);
        Ok(())
    }

    /// Fill a freed bed from the bed-wait lines the zone serves
    fn backfill(&mut self, zone: Zone) -> Result<(), SimulationError> {
        if let Some((bucket, next)) = self
            .state
            .queues
            .bed
            .pop_first(allocation::backfill_precedence(zone))
        {
            trace!("{} backfills {} from {:?}", next, zone, bucket);
            let class = self.state.patient(next)?.require_class()?;
            self.occupy_bed(next, zone)?;
            self.request_workup(next, class)?;
        }
        Ok(())
    }

    // ========================================================================
    // Workup
    // ========================================================================

    /// Queue for a doctor, or start immediately if one is free.
    ///
    /// The workup time is drawn only when service starts.
    fn request_workup(&mut self, id: PatientId, class: TriageClass) -> Result<(), SimulationError> {
        if self.state.doctors.is_saturated() {
            let bucket = class.bucket();
            self.state.queues.workup.push(bucket, id);
            self.state
                .patient_mut(id)?
                .move_to(PatientLocation::WorkupQueue(bucket));
            Ok(())
        } else {
            self.begin_workup(id, class)
        }
    }

    fn begin_workup(&mut self, id: PatientId, class: TriageClass) -> Result<(), SimulationError> {
        self.state.doctors.acquire()?;
        let duration = self
            .config
            .service
            .sample_workup(class, &mut self.variates)?;
        self.schedule_workup(id, duration)
    }

    /// Workup for classes 1–2, which may preempt a lower-priority patient
    ///
    /// The workup time is drawn up front, whether or not a doctor is found.
    fn start_urgent_workup(
        &mut self,
        id: PatientId,
        class: TriageClass,
    ) -> Result<(), SimulationError> {
        let duration = self
            .config
            .service
            .sample_workup(class, &mut self.variates)?;

        if !self.state.doctors.is_saturated() {
            self.state.doctors.acquire()?;
            return self.schedule_workup(id, duration);
        }

        if self.config.preemption_enabled && self.preempt_workup(id, class)? {
            // The doctor passes straight from the victim to `id`.
            return self.schedule_workup(id, duration);
        }

        let bucket = class.bucket();
        self.state.queues.workup.push(bucket, id);
        self.state
            .patient_mut(id)?
            .move_to(PatientLocation::WorkupQueue(bucket));
        Ok(())
    }

    /// Take the doctor of the earliest-finishing workup whose patient has a
    /// strictly lower priority than `class`
    ///
    /// Returns `false` when no such workup is in progress. The victim's
    /// partial service is discarded.
    fn preempt_workup(&mut self, id: PatientId, class: TriageClass) -> Result<bool, SimulationError> {
        let patients = &self.state.patients;
        let removed = self.state.fel.find_and_remove(|event| match event.kind() {
            EventKind::WorkupDeparture(pid) => patients
                .get(&pid)
                .and_then(|p| p.triage_class())
                .map_or(false, |victim| victim > class),
            _ => false,
        });

        let victim = match removed.and_then(|event| event.patient()) {
            Some(victim) => victim,
            None => return Ok(false),
        };

        let bucket = self.state.patient(victim)?.require_class()?.bucket();
        self.state.queues.interrupted.push(bucket, victim);
        self.state
            .patient_mut(victim)?
            .move_to(PatientLocation::Interrupted(bucket));
        self.stats.record_preemption();

        let now = self.now();
        trace!("t={} {} preempts {}", now, id, victim);
        if self.config.record_event_log {
            self.event_log.log(EventRecord::Preempted {
                time: now.minutes(),
                preempting: id,
                preempted: victim,
            });
        }
        Ok(true)
    }

    fn schedule_workup(&mut self, id: PatientId, duration: f64) -> Result<(), SimulationError> {
        self.schedule_in(duration, EventKind::WorkupDeparture(id))?;
        self.state.patient_mut(id)?.move_to(PatientLocation::InWorkup);
        Ok(())
    }

    /// Hand free doctors to interrupted patients first, then the workup
    /// lines, highest priority first. Each gets a fresh workup time.
    fn drain_doctor_queues(&mut self) -> Result<(), SimulationError> {
        while !self.state.doctors.is_saturated() {
            let next = self
                .state
                .queues
                .interrupted
                .pop_first(&INTERRUPT_DRAIN_ORDER)
                .or_else(|| self.state.queues.workup.pop_first(&WORKUP_DRAIN_ORDER));

            match next {
                Some((_, id)) => {
                    let class = self.state.patient(id)?.require_class()?;
                    self.begin_workup(id, class)?;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Classes 1–2 always see the specialist; classes 3–5 draw for a referral.
    pub(super) fn handle_workup_departure(&mut self, id: PatientId) -> Result<(), SimulationError> {
        self.state.doctors.release()?;
        self.drain_doctor_queues()?;

        let class = self.state.patient(id)?.require_class()?;
        if class.can_preempt() || self.config.service.sample_referral(&mut self.variates)? {
            self.request_specialist(id)
        } else {
            self.discharge(id)
        }
    }

    // ========================================================================
    // Specialist
    // ========================================================================

    fn request_specialist(&mut self, id: PatientId) -> Result<(), SimulationError> {
        if self.state.specialists.is_saturated() {
            self.state.queues.specialist.push_back(id);
            self.state
                .patient_mut(id)?
                .move_to(PatientLocation::SpecialistQueue);
            Ok(())
        } else {
            self.begin_specialist(id)
        }
    }

    fn begin_specialist(&mut self, id: PatientId) -> Result<(), SimulationError> {
        self.state.specialists.acquire()?;
        let duration = self.config.service.sample_specialist(&mut self.variates)?;
        self.schedule_in(duration, EventKind::SpecialistDeparture(id))?;
        self.state
            .patient_mut(id)?
            .move_to(PatientLocation::WithSpecialist);
        Ok(())
    }

    pub(super) fn handle_specialist_departure(
        &mut self,
        id: PatientId,
    ) -> Result<(), SimulationError> {
        self.state.specialists.release()?;
        if let Some(next) = self.state.queues.specialist.pop_front() {
            self.begin_specialist(next)?;
        }
        self.discharge(id)
    }

    // ========================================================================
    // Departure
    // ========================================================================

    fn discharge(&mut self, id: PatientId) -> Result<(), SimulationError> {
        let patient = self.state.remove_patient(id)?;
        let zone = patient.require_zone()?;
        self.state.beds.vacate(zone)?;
        self.stats.record_departure();

        let now = self.now();
        trace!("t={} {} discharged from {}", now, id, zone);
        if self.config.record_event_log {
            self.event_log.log(EventRecord::Discharged {
                time: now.minutes(),
                patient: id,
                zone,
                arrival_mode: patient.arrival_mode(),
                length_of_stay: now.minutes() - patient.arrival_time(),
            });
        }

        self.backfill(zone)
    }

    fn schedule_in(&mut self, delay: f64, kind: EventKind) -> Result<(), SimulationError> {
        let at = self.now().after(delay)?;
        self.state.fel.schedule(Event::new(at, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SimulationConfig;
    use crate::rng::ScriptedVariates;

    /// Uniform that makes `-ln(1-u)` equal `x`
    fn inv(x: f64) -> f64 {
        1.0 - (-x).exp()
    }

    fn scripted(config: SimulationConfig, draws: Vec<f64>) -> Simulation<ScriptedVariates> {
        Simulation::with_variates(config, ScriptedVariates::new(draws)).unwrap()
    }

    #[test]
    fn test_walk_in_goes_straight_to_free_nurse() {
        // interarrival, walk-in coin, walk-in class 4, triage duration
        let mut sim = scripted(
            SimulationConfig::default(),
            vec![inv(1.0), 0.9, 0.5, inv(1.0)],
        );
        sim.step().unwrap();

        let patient = sim.state().patient(PatientId(1)).unwrap();
        assert_eq!(patient.location(), PatientLocation::InTriage);
        assert_eq!(patient.triage_class(), Some(TriageClass::FOUR));
        assert_eq!(sim.state().nurses().busy(), 1);
        assert_eq!(sim.variates().remaining(), 0);
        sim.verify_invariants().unwrap();
    }

    #[test]
    fn test_ambulance_class_one_takes_zone_one_and_doctor() {
        let mut sim = scripted(
            SimulationConfig::default(),
            vec![inv(1.0), 0.1, 0.1, inv(1.0)],
        );
        sim.step().unwrap();

        let patient = sim.state().patient(PatientId(1)).unwrap();
        assert_eq!(patient.zone(), Some(Zone::One));
        assert_eq!(patient.location(), PatientLocation::InWorkup);
        assert_eq!(sim.state().doctors().busy(), 1);
        assert_eq!(sim.state().beds().occupied(Zone::One), 1);
        sim.verify_invariants().unwrap();
    }

    #[test]
    fn test_second_walk_in_queues_for_triage() {
        let draws = vec![
            inv(0.01), 0.9, 0.5, inv(1.0), // first walk-in, triage starts
            inv(1.0), 0.9, // second walk-in queues; no class drawn yet
        ];
        let mut sim = scripted(SimulationConfig::default(), draws);
        sim.step().unwrap();
        sim.step().unwrap();

        assert_eq!(sim.state().queues().triage.len(), 1);
        let second = sim.state().patient(PatientId(2)).unwrap();
        assert_eq!(second.location(), PatientLocation::TriageQueue);
        assert_eq!(second.triage_class(), None);
        sim.verify_invariants().unwrap();
    }
}
