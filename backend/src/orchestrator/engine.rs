//! Simulation Engine
//!
//! Next-event loop over the future event list:
//!
//! ```text
//! Until the clock reaches the horizon (or the FEL empties):
//! 1. Snapshot queue lengths and busy counts (the state held since the last event)
//! 2. Pop the earliest event, advancing the clock
//! 3. Accumulate time-weighted areas over the elapsed interval
//! 4. Dispatch to the event's handler
//! 5. Update running maxima from the post-handler state
//! ```
//!
//! The event that reaches or crosses the horizon is processed in full, and
//! its time (not the horizon) is the divisor for every rate statistic.
//!
//! # Example
//!
//! ```rust
//! use ed_simulator_core::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     horizon_minutes: 120.0,
//!     rng_seed: 7,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let result = sim.run().unwrap();
//!
//! assert!(result.final_clock >= 120.0);
//! assert!(result.patients_admitted >= result.patients_departed);
//! ```

use crate::arrivals::ArrivalConfig;
use crate::core::time::SimTime;
use crate::events::{Event, EventKind};
use crate::models::event::{EventLog, EventRecord};
use crate::models::state::SimulationState;
use crate::rng::{RngManager, VariateSource};
use crate::service::ServiceConfig;
use crate::stats::{ReplicationResult, StatisticsCollector};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================

/// Complete configuration of one replication
///
/// Every field has a default, so a JSON document only needs to name what it
/// changes. Arrival and service parameters are flattened into the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Run until the clock reaches this many minutes
    pub horizon_minutes: f64,

    /// Seed for the xorshift64* stream
    pub rng_seed: u64,

    pub nurses: usize,
    pub doctors: usize,
    pub specialists: usize,

    /// Bed capacity of zones 1..4
    pub zone_beds: [usize; 4],

    #[serde(flatten)]
    pub arrivals: ArrivalConfig,

    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Allow class 1–2 patients to take a doctor from a lower-priority workup
    pub preemption_enabled: bool,

    /// Keep a structured [`EventLog`] of processed events and decisions
    pub record_event_log: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: 480.0,
            rng_seed: 12345,
            nurses: 1,
            doctors: 2,
            specialists: 1,
            zone_beds: [14, 4, 6, 12],
            arrivals: ArrivalConfig::default(),
            service: ServiceConfig::default(),
            preemption_enabled: true,
            record_event_log: false,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::Serialization(format!("config parse failed: {}", e)))
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.horizon_minutes.is_finite() && self.horizon_minutes >= 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "horizon must be finite and >= 0, got {}",
                self.horizon_minutes
            )));
        }

        for (name, capacity) in [
            ("nurses", self.nurses),
            ("doctors", self.doctors),
            ("specialists", self.specialists),
        ] {
            if capacity == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be > 0",
                    name
                )));
            }
        }

        if let Some(zone) = self.zone_beds.iter().position(|beds| *beds == 0) {
            return Err(SimulationError::InvalidConfig(format!(
                "zone {} has no beds",
                zone + 1
            )));
        }

        self.arrivals.validate()?;
        self.service.validate()?;
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Everything that can abort a replication
///
/// Nothing is clamped or retried: the first error ends the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The engine reached a state its invariants forbid
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A variate source produced a draw outside (0, 1), NaN included
    #[error("Variate {0} outside the open interval (0, 1)")]
    VariateOutOfRange(f64),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Simulation
// ============================================================================

/// One replication: state, variate stream and statistics
///
/// Generic over the [`VariateSource`] so hand-built scenarios can script
/// every draw; [`Simulation::new`] uses the seeded [`RngManager`].
pub struct Simulation<V: VariateSource = RngManager> {
    pub(super) config: SimulationConfig,
    pub(super) state: SimulationState,
    pub(super) variates: V,
    pub(super) stats: StatisticsCollector,
    pub(super) event_log: EventLog,
    finished: bool,
}

impl Simulation<RngManager> {
    /// Create a replication seeded from `config.rng_seed`
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_variates(config, rng)
    }
}

impl<V: VariateSource> Simulation<V> {
    /// Create a replication drawing from an explicit variate source
    ///
    /// The FEL starts with a single Arrival at t = 0.
    pub fn with_variates(config: SimulationConfig, variates: V) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut state = SimulationState::new(
            config.nurses,
            config.doctors,
            config.specialists,
            config.zone_beds,
        );
        state
            .fel
            .schedule(Event::new(SimTime::ZERO, EventKind::Arrival))?;

        Ok(Self {
            config,
            state,
            variates,
            stats: StatisticsCollector::new(),
            event_log: EventLog::new(),
            finished: false,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn stats(&self) -> &StatisticsCollector {
        &self.stats
    }

    /// Structured log (empty unless `record_event_log` is set)
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn variates(&self) -> &V {
        &self.variates
    }

    pub fn now(&self) -> SimTime {
        self.state.fel.now()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn verify_invariants(&self) -> Result<(), SimulationError> {
        self.state.verify_invariants()
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Process the next event
    ///
    /// Returns the processed event, or `None` once the run is over.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        if self.finished {
            return Ok(None);
        }

        let lengths = self.state.queue_lengths();
        let busy = self.state.busy_counts();

        let event = match self.state.fel.pop_earliest()? {
            Some(event) => event,
            None => {
                warn!(
                    "future event list empty at t={}; ending run before horizon {}",
                    self.now(),
                    self.config.horizon_minutes
                );
                self.finished = true;
                return Ok(None);
            }
        };

        let now = self.now();
        let elapsed = now.minutes() - self.state.fel.previous().minutes();
        self.stats.accumulate(elapsed, lengths, busy);

        debug!("t={} {}", now, describe(&event));

        match event.kind() {
            EventKind::Arrival => self.handle_arrival()?,
            EventKind::TriageDeparture(id) => self.handle_triage_departure(id)?,
            EventKind::WorkupDeparture(id) => self.handle_workup_departure(id)?,
            EventKind::SpecialistDeparture(id) => self.handle_specialist_departure(id)?,
        }

        self.stats.observe_peaks(self.state.queue_lengths());
        self.stats.record_event();
        if self.config.record_event_log {
            self.event_log.log(EventRecord::Processed {
                time: now.minutes(),
                kind: event.kind(),
            });
        }

        if now.minutes() >= self.config.horizon_minutes {
            self.finished = true;
        }

        Ok(Some(event))
    }

    /// Run to completion and return the report
    pub fn run(&mut self) -> Result<ReplicationResult, SimulationError> {
        info!(
            "starting replication: seed={} horizon={} doctors={} preemption={}",
            self.config.rng_seed,
            self.config.horizon_minutes,
            self.config.doctors,
            self.config.preemption_enabled
        );

        while !self.finished {
            self.step()?;
        }

        let result = self.report();
        info!(
            "replication finished at t={:.3}: {} events, {} admitted, {} departed, {} preemptions",
            result.final_clock,
            result.events_processed,
            result.patients_admitted,
            result.patients_departed,
            result.preemptions
        );
        Ok(result)
    }

    /// Statistics up to the current clock
    pub fn report(&self) -> ReplicationResult {
        self.stats
            .finish(self.now().minutes(), self.state.capacities())
    }
}

impl<V: VariateSource> std::fmt::Debug for Simulation<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.now())
            .field("num_patients", &self.state.num_patients())
            .field("pending_events", &self.state.fel.len())
            .field("events_processed", &self.stats.events())
            .field("finished", &self.finished)
            .finish()
    }
}

fn describe(event: &Event) -> String {
    match event.patient() {
        Some(id) => format!("{} {}", event.event_type(), id),
        None => event.event_type().to_string(),
    }
}

/// Run one seeded replication of `config`
pub fn run_replication(config: &SimulationConfig) -> Result<ReplicationResult, SimulationError> {
    Simulation::new(config.clone())?.run()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedVariates;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_doctors() {
        let config = SimulationConfig {
            doctors: 0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_negative_horizon() {
        let config = SimulationConfig {
            horizon_minutes: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unsorted_thresholds() {
        let mut config = SimulationConfig::default();
        config.arrivals.ambulance_class_thresholds = [0.5, 0.2, 0.85];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimulationConfig::from_json(r#"{"doctors": 3, "arrival_rate_per_hour": 6.0}"#).unwrap();
        assert_eq!(config.doctors, 3);
        assert_eq!(config.arrivals.rate_per_hour, 6.0);
        assert_eq!(config.nurses, 1);
        assert_eq!(config.service, ServiceConfig::default());
    }

    #[test]
    fn test_config_json_is_flat() {
        let value = serde_json::to_value(SimulationConfig::default()).unwrap();
        assert!(value.get("arrival_rate_per_hour").is_some());
        assert!(value.get("workup_rate_per_hour").is_some());
        assert!(value.get("arrivals").is_none());
    }

    #[test]
    fn test_initial_fel_holds_one_arrival() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.state().fel().len(), 1);
        assert_eq!(
            sim.state().fel().peek().map(|e| e.kind()),
            Some(EventKind::Arrival)
        );
        assert!(!sim.is_finished());
    }

    #[test]
    fn test_exhausted_script_aborts_run() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::with_variates(config, ScriptedVariates::new(vec![])).unwrap();
        assert!(matches!(
            sim.step(),
            Err(SimulationError::VariateOutOfRange(u)) if u.is_nan()
        ));
    }

    #[test]
    fn test_step_after_finish_is_none() {
        let config = SimulationConfig {
            horizon_minutes: 0.0,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.step().unwrap().is_some());
        assert!(sim.is_finished());
        assert!(sim.step().unwrap().is_none());
    }
}
