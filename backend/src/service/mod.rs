//! Service-time distributions
//!
//! All durations are in minutes and sampled by inversion from a single
//! uniform draw, except the specialist visit which may add a uniformly
//! distributed test delay (two extra draws' worth of decision and length).
//!
//! Workup and specialist parameters are *rates per hour*: a workup for class
//! `c` lasts `-ln(1-u) · 60 / workup_rate_per_hour[c]` minutes. Triage takes
//! a mean in minutes directly.

use crate::models::patient::TriageClass;
use crate::orchestrator::SimulationError;
use crate::rng::{checked_draw, exponential, VariateSource};
use serde::{Deserialize, Serialize};

/// Service stage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Mean triage minutes for classes 3, 4, 5
    pub triage_mean_minutes: [f64; 3],

    /// Workup completions per hour for classes 1..5
    pub workup_rate_per_hour: [f64; 5],

    /// Specialist completions per hour
    pub specialist_rate_per_hour: f64,

    /// Probability a specialist visit needs tests
    pub specialist_test_probability: f64,

    /// Test delay bounds in minutes (uniform)
    pub specialist_test_delay_minutes: (f64, f64),

    /// Probability a class 3–5 patient is referred to the specialist
    pub specialist_referral_probability: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            triage_mean_minutes: [1.5, 13.0, 13.0],
            workup_rate_per_hour: [0.9, 1.7, 2.5, 3.3, 4.1],
            specialist_rate_per_hour: 2.5,
            specialist_test_probability: 0.2,
            specialist_test_delay_minutes: (20.0, 60.0),
            specialist_referral_probability: 0.3,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !self.triage_mean_minutes.iter().all(|m| positive(*m)) {
            return Err(SimulationError::InvalidConfig(format!(
                "triage means must be positive: {:?}",
                self.triage_mean_minutes
            )));
        }
        if !self.workup_rate_per_hour.iter().all(|r| positive(*r)) {
            return Err(SimulationError::InvalidConfig(format!(
                "workup rates must be positive: {:?}",
                self.workup_rate_per_hour
            )));
        }
        if !positive(self.specialist_rate_per_hour) {
            return Err(SimulationError::InvalidConfig(format!(
                "specialist rate must be positive, got {}",
                self.specialist_rate_per_hour
            )));
        }
        for (name, p) in [
            ("specialist test", self.specialist_test_probability),
            ("specialist referral", self.specialist_referral_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} probability {} outside [0, 1]",
                    name, p
                )));
            }
        }
        let (lo, hi) = self.specialist_test_delay_minutes;
        if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo <= hi) {
            return Err(SimulationError::InvalidConfig(format!(
                "test delay bounds ({}, {}) must satisfy 0 <= min <= max",
                lo, hi
            )));
        }
        Ok(())
    }

    /// Triage duration for a walk-in just classified as `class` (3–5)
    pub fn triage_minutes(&self, class: TriageClass, u: f64) -> Result<f64, SimulationError> {
        let mean = match class.value() {
            3..=5 => self.triage_mean_minutes[(class.value() - 3) as usize],
            _ => {
                return Err(SimulationError::InvariantViolation(format!(
                    "{} cannot come out of triage",
                    class
                )))
            }
        };
        Ok(exponential(u, mean))
    }

    pub fn workup_minutes(&self, class: TriageClass, u: f64) -> f64 {
        exponential(u, 60.0 / self.workup_rate_per_hour[class.index()])
    }

    /// Specialist visit without tests
    pub fn specialist_minutes(&self, u: f64) -> f64 {
        exponential(u, 60.0 / self.specialist_rate_per_hour)
    }

    pub fn test_delay_minutes(&self, u: f64) -> f64 {
        let (lo, hi) = self.specialist_test_delay_minutes;
        lo + u * (hi - lo)
    }

    pub fn sample_triage<V: VariateSource + ?Sized>(
        &self,
        class: TriageClass,
        src: &mut V,
    ) -> Result<f64, SimulationError> {
        self.triage_minutes(class, checked_draw(src)?)
    }

    pub fn sample_workup<V: VariateSource + ?Sized>(
        &self,
        class: TriageClass,
        src: &mut V,
    ) -> Result<f64, SimulationError> {
        Ok(self.workup_minutes(class, checked_draw(src)?))
    }

    /// Full specialist occupancy: visit, then a test-decision draw, then
    /// (only when tests are needed) the test-delay draw.
    pub fn sample_specialist<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<f64, SimulationError> {
        let visit = self.specialist_minutes(checked_draw(src)?);
        if checked_draw(src)? <= self.specialist_test_probability {
            Ok(visit + self.test_delay_minutes(checked_draw(src)?))
        } else {
            Ok(visit)
        }
    }

    /// Whether a class 3–5 patient leaving workup goes on to the specialist
    pub fn sample_referral<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<bool, SimulationError> {
        Ok(checked_draw(src)? <= self.specialist_referral_probability)
    }
}
