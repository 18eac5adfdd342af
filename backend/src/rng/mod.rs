//! Deterministic random variates
//!
//! The engine never touches a generator directly: every uniform draw goes
//! through the [`VariateSource`] trait so that the draw sequence can be
//! replayed exactly (seeded xorshift64*) or scripted (recorded streams, tests).
//!
//! CRITICAL: draws must lie in the open interval (0, 1). Service times are
//! derived as `-ln(1 - u)`, which is undefined at `u = 1`.

mod scripted;
mod xorshift;

pub use scripted::ScriptedVariates;
pub use xorshift::RngManager;

/// Ordered stream of independent uniform draws.
///
/// Implementations must return values strictly inside (0, 1). The engine
/// validates every draw and aborts the replication on anything else, so a
/// misbehaving source surfaces as [`SimulationError::VariateOutOfRange`]
/// instead of a silently skewed result.
///
/// [`SimulationError::VariateOutOfRange`]: crate::SimulationError::VariateOutOfRange
pub trait VariateSource {
    /// Next uniform draw from the stream.
    fn next_uniform(&mut self) -> f64;
}

impl VariateSource for RngManager {
    fn next_uniform(&mut self) -> f64 {
        self.next_open01()
    }
}

impl<V: VariateSource + ?Sized> VariateSource for Box<V> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Take one draw and reject anything outside the open interval (0, 1)
///
/// # Errors
/// `VariateOutOfRange` for 0, 1, values beyond them, and NaN.
pub fn checked_draw<V: VariateSource + ?Sized>(
    source: &mut V,
) -> Result<f64, crate::orchestrator::SimulationError> {
    let u = source.next_uniform();
    if u > 0.0 && u < 1.0 {
        Ok(u)
    } else {
        Err(crate::orchestrator::SimulationError::VariateOutOfRange(u))
    }
}

/// Exponential variate with the given mean, by inversion: `-ln(1 - u) · mean`
pub fn exponential(u: f64, mean: f64) -> f64 {
    -(1.0 - u).ln() * mean
}
