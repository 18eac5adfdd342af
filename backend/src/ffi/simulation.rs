//! PyO3 wrapper for the simulation engine
//!
//! # Example (from Python)
//!
//! ```python
//! import json
//! from ed_simulator_core import Simulation, run_replications
//!
//! config = json.dumps({"horizon_minutes": 600, "doctors": 3})
//! averaged = json.loads(run_replications(config, 10))
//! print(averaged["utilization_pct"]["workup"])
//!
//! sim = Simulation(config)
//! while sim.step() is not None:
//!     pass
//! print(json.loads(sim.report()))
//! ```

use pyo3::prelude::*;

use super::types::{parse_config, to_json, to_py_err};
use crate::orchestrator::{self, Simulation};

/// Run one replication; returns the result as JSON
#[pyfunction]
pub fn run_replication(config_json: &str) -> PyResult<String> {
    let config = parse_config(config_json)?;
    let result = orchestrator::run_replication(&config).map_err(to_py_err)?;
    to_json(&result)
}

/// Run `n` seeded replications; returns the averaged result as JSON
#[pyfunction]
pub fn run_replications(config_json: &str, n: usize) -> PyResult<String> {
    let config = parse_config(config_json)?;
    let averaged = orchestrator::run_replications(&config, n).map_err(to_py_err)?;
    to_json(&averaged)
}

/// SHA-256 fingerprint of any JSON document, keys canonicalised
#[pyfunction]
pub fn fingerprint(json: &str) -> PyResult<String> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        to_py_err(crate::SimulationError::Serialization(e.to_string()))
    })?;
    orchestrator::fingerprint(&value).map_err(to_py_err)
}

/// Step-by-step access to a single replication
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: Simulation,
}

#[pymethods]
impl PySimulation {
    #[new]
    fn new(config_json: &str) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let inner = Simulation::new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Process one event; returns its type name, or None when finished
    fn step(&mut self) -> PyResult<Option<String>> {
        let event = self.inner.step().map_err(to_py_err)?;
        Ok(event.map(|e| e.event_type().to_string()))
    }

    /// Run to completion; returns the result as JSON
    fn run(&mut self) -> PyResult<String> {
        let result = self.inner.run().map_err(to_py_err)?;
        to_json(&result)
    }

    /// Statistics up to the current clock, as JSON
    fn report(&self) -> PyResult<String> {
        to_json(&self.inner.report())
    }

    fn now(&self) -> f64 {
        self.inner.now().minutes()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Recorded event log as a JSON array (empty unless enabled in the config)
    fn event_log(&self) -> PyResult<String> {
        to_json(&self.inner.event_log().records())
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}
