//! Replayable fixed sequence of draws

use super::VariateSource;
use std::collections::VecDeque;

/// Variate source that replays a fixed list of uniforms in order.
///
/// Used to drive the engine through hand-built scenarios and to replay a
/// recorded stream. Once the list is exhausted every further draw is NaN,
/// which the engine rejects as out of range.
///
/// # Example
/// ```
/// use ed_simulator_core::{ScriptedVariates, VariateSource};
///
/// let mut src = ScriptedVariates::new(vec![0.25, 0.75]);
/// assert_eq!(src.next_uniform(), 0.25);
/// assert_eq!(src.remaining(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedVariates {
    draws: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedVariates {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    /// Draws handed out so far (including NaNs past the end)
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl VariateSource for ScriptedVariates {
    fn next_uniform(&mut self) -> f64 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_script_yields_nan() {
        let mut src = ScriptedVariates::new(vec![0.5]);
        assert_eq!(src.next_uniform(), 0.5);
        assert!(src.next_uniform().is_nan());
        assert_eq!(src.consumed(), 2);
    }
}
