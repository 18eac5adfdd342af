//! Conversion helpers for the FFI boundary

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde::Serialize;

use crate::orchestrator::{SimulationConfig, SimulationError};

/// Map a simulation error onto the matching Python exception
///
/// Bad input raises `ValueError`; failures during a run raise `RuntimeError`.
pub fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvalidConfig(_) | SimulationError::Serialization(_) => {
            PyValueError::new_err(err.to_string())
        }
        SimulationError::InvariantViolation(_) | SimulationError::VariateOutOfRange(_) => {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

pub fn parse_config(config_json: &str) -> PyResult<SimulationConfig> {
    SimulationConfig::from_json(config_json).map_err(to_py_err)
}

pub fn to_json<T: Serialize>(record: &T) -> PyResult<String> {
    serde_json::to_string(record)
        .map_err(|e| to_py_err(SimulationError::Serialization(e.to_string())))
}
