//! Arrival process and classification
//!
//! Patients arrive as a Poisson stream. Each arrival is routed by a coin
//! flip to the ambulance bay (classified on the spot, classes 1–4) or the
//! walk-in entrance (classified later by a triage nurse, classes 3–5).
//!
//! # Key Principles
//!
//! 1. **Determinism**: one draw per decision, always in the same order
//! 2. **Cumulative thresholds**: a class is the first threshold `u` does not exceed
//!
//! # Example
//!
//! ```
//! use ed_simulator_core::arrivals::ArrivalConfig;
//! use ed_simulator_core::models::TriageClass;
//!
//! let config = ArrivalConfig::default();
//! assert_eq!(config.ambulance_class(0.1), TriageClass::ONE);
//! assert_eq!(config.ambulance_class(0.9), TriageClass::FOUR);
//! assert_eq!(config.walk_in_class(0.5), TriageClass::FOUR);
//! ```

use crate::models::patient::{ArrivalMode, TriageClass};
use crate::orchestrator::SimulationError;
use crate::rng::{checked_draw, exponential, VariateSource};
use serde::{Deserialize, Serialize};

/// Arrival stream parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Mean arrivals per hour (Poisson rate)
    #[serde(rename = "arrival_rate_per_hour")]
    pub rate_per_hour: f64,

    /// Probability an arrival comes by ambulance
    pub ambulance_probability: f64,

    /// Cumulative thresholds for ambulance classes 1, 2, 3; above → 4
    pub ambulance_class_thresholds: [f64; 3],

    /// Cumulative thresholds for walk-in classes 3, 4; above → 5
    pub walk_in_class_thresholds: [f64; 2],
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            rate_per_hour: 4.5,
            ambulance_probability: 0.5,
            ambulance_class_thresholds: [0.2, 0.5, 0.85],
            walk_in_class_thresholds: [0.33333, 0.66667],
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.rate_per_hour.is_finite() && self.rate_per_hour > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "arrival rate must be positive, got {}",
                self.rate_per_hour
            )));
        }
        if !(0.0..=1.0).contains(&self.ambulance_probability) {
            return Err(SimulationError::InvalidConfig(format!(
                "ambulance probability {} outside [0, 1]",
                self.ambulance_probability
            )));
        }
        check_thresholds("ambulance", &self.ambulance_class_thresholds)?;
        check_thresholds("walk-in", &self.walk_in_class_thresholds)?;
        Ok(())
    }

    /// Minutes until the next arrival
    pub fn interarrival(&self, u: f64) -> f64 {
        exponential(u, 60.0 / self.rate_per_hour)
    }

    pub fn mode(&self, u: f64) -> ArrivalMode {
        if u <= self.ambulance_probability {
            ArrivalMode::Ambulance
        } else {
            ArrivalMode::WalkIn
        }
    }

    pub fn ambulance_class(&self, u: f64) -> TriageClass {
        const CLASSES: [TriageClass; 4] = [
            TriageClass::ONE,
            TriageClass::TWO,
            TriageClass::THREE,
            TriageClass::FOUR,
        ];
        pick_class(u, &self.ambulance_class_thresholds, &CLASSES)
    }

    pub fn walk_in_class(&self, u: f64) -> TriageClass {
        const CLASSES: [TriageClass; 3] =
            [TriageClass::THREE, TriageClass::FOUR, TriageClass::FIVE];
        pick_class(u, &self.walk_in_class_thresholds, &CLASSES)
    }

    pub fn sample_interarrival<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<f64, SimulationError> {
        Ok(self.interarrival(checked_draw(src)?))
    }

    pub fn sample_mode<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<ArrivalMode, SimulationError> {
        Ok(self.mode(checked_draw(src)?))
    }

    pub fn sample_ambulance_class<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<TriageClass, SimulationError> {
        Ok(self.ambulance_class(checked_draw(src)?))
    }

    pub fn sample_walk_in_class<V: VariateSource + ?Sized>(
        &self,
        src: &mut V,
    ) -> Result<TriageClass, SimulationError> {
        Ok(self.walk_in_class(checked_draw(src)?))
    }
}

/// First class whose cumulative threshold is not exceeded; the last class
/// takes everything above the final threshold.
fn pick_class(u: f64, thresholds: &[f64], classes: &[TriageClass]) -> TriageClass {
    thresholds
        .iter()
        .position(|t| u <= *t)
        .map(|i| classes[i])
        .unwrap_or(classes[classes.len() - 1])
}

fn check_thresholds(name: &str, thresholds: &[f64]) -> Result<(), SimulationError> {
    let in_range = thresholds.iter().all(|t| (0.0..=1.0).contains(t));
    let ascending = thresholds.windows(2).all(|w| w[0] <= w[1]);
    if in_range && ascending {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "{} class thresholds {:?} must be ascending within [0, 1]",
            name, thresholds
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let config = ArrivalConfig::default();
        assert_eq!(config.ambulance_class(0.2), TriageClass::ONE);
        assert_eq!(config.ambulance_class(0.5), TriageClass::TWO);
        assert_eq!(config.ambulance_class(0.85), TriageClass::THREE);
        assert_eq!(config.ambulance_class(0.850001), TriageClass::FOUR);
    }

    #[test]
    fn test_ambulance_never_yields_class_five() {
        let config = ArrivalConfig::default();
        for i in 1..1000 {
            let u = i as f64 / 1000.0;
            assert_ne!(config.ambulance_class(u), TriageClass::FIVE);
        }
    }

    #[test]
    fn test_walk_in_classes_are_three_to_five() {
        let config = ArrivalConfig::default();
        assert_eq!(config.walk_in_class(0.1), TriageClass::THREE);
        assert_eq!(config.walk_in_class(0.9), TriageClass::FIVE);
    }

    #[test]
    fn test_mode_coin() {
        let config = ArrivalConfig::default();
        assert_eq!(config.mode(0.5), ArrivalMode::Ambulance);
        assert_eq!(config.mode(0.51), ArrivalMode::WalkIn);
    }

    #[test]
    fn test_interarrival_mean_in_minutes() {
        let config = ArrivalConfig::default();
        // u = 1 - e^-1 gives exactly one mean: 60 / 4.5 minutes
        let u = 1.0 - (-1.0f64).exp();
        assert!((config.interarrival(u) - 60.0 / 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_descending_thresholds_rejected() {
        let config = ArrivalConfig {
            ambulance_class_thresholds: [0.5, 0.2, 0.85],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
