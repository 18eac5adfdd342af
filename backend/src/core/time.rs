//! Simulated time
//!
//! The simulation runs in continuous time measured in minutes. The clock
//! only ever moves forward; an attempt to move it backwards is a defect in
//! the event list and is reported, never clamped.

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A point in simulated time, in minutes since the start of the replication.
///
/// Totally ordered so it can key the future event list. Construction through
/// [`SimTime::new`] rejects NaN and infinities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Create a time value, rejecting non-finite and negative minutes
    pub fn new(minutes: f64) -> Result<Self, SimulationError> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(SimulationError::InvariantViolation(format!(
                "invalid simulated time {}",
                minutes
            )));
        }
        // -0.0 + 0.0 is +0.0
        Ok(SimTime(minutes + 0.0))
    }

    pub fn minutes(self) -> f64 {
        self.0
    }

    /// Time `delay` minutes after `self`
    pub fn after(self, delay: f64) -> Result<Self, SimulationError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SimulationError::InvariantViolation(format!(
                "invalid delay {} at t={}",
                delay, self.0
            )));
        }
        SimTime::new(self.0 + delay)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}min", self.0)
    }
}

/// Monotonic simulation clock
///
/// # Example
/// ```
/// use ed_simulator_core::{SimClock, SimTime};
///
/// let mut clock = SimClock::new();
/// let elapsed = clock.advance_to(SimTime::new(2.5).unwrap()).unwrap();
/// assert_eq!(elapsed, 2.5);
/// assert!(clock.advance_to(SimTime::new(1.0).unwrap()).is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    now: f64,
    previous: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        SimTime(self.now)
    }

    /// Time before the most recent advance
    pub fn previous(&self) -> SimTime {
        SimTime(self.previous)
    }

    /// Move the clock to `to` and return the elapsed minutes
    ///
    /// # Errors
    /// `InvariantViolation` if `to` lies before the current time.
    pub fn advance_to(&mut self, to: SimTime) -> Result<f64, SimulationError> {
        if to.0 < self.now {
            return Err(SimulationError::InvariantViolation(format!(
                "clock moved backwards from {} to {}",
                self.now, to.0
            )));
        }
        self.previous = self.now;
        self.now = to.0;
        Ok(self.now - self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_rejects_nan() {
        assert!(SimTime::new(f64::NAN).is_err());
        assert!(SimTime::new(f64::INFINITY).is_err());
        assert!(SimTime::new(-0.5).is_err());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let t = SimTime::new(-0.0).unwrap();
        assert_eq!(t, SimTime::ZERO);
        assert_eq!(t.cmp(&SimTime::ZERO), Ordering::Equal);
        assert!(t.minutes().is_sign_positive());
    }

    #[test]
    fn test_eq_agrees_with_ord() {
        let a = SimTime::new(1.5).unwrap();
        let b = SimTime::new(1.5).unwrap();
        let c = SimTime::new(2.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, c);
        assert_eq!(a.cmp(&c), Ordering::Less);
    }

    #[test]
    fn test_equal_advance_is_zero_elapsed() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime::new(3.0).unwrap()).unwrap();
        let elapsed = clock.advance_to(SimTime::new(3.0).unwrap()).unwrap();
        assert_eq!(elapsed, 0.0);
        assert_eq!(clock.previous().minutes(), 3.0);
    }
}
