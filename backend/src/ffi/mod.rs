//! Python bindings (feature `pyo3`)
//!
//! Configs and results cross the boundary as JSON text, so the Python side
//! sees exactly the serde representation used everywhere else.

pub mod simulation;
pub mod types;

pub use simulation::{fingerprint, run_replication, run_replications, PySimulation};
