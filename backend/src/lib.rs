//! Emergency Department Simulator Core - Rust Engine
//!
//! Discrete-event simulation of patient flow through an emergency
//! department: arrivals, triage, zone beds, doctor workup with priority
//! preemption, and specialist consultation.
//!
//! # Architecture
//!
//! - **core**: Simulation time and clock
//! - **events**: Event types and the future event list
//! - **models**: Domain types (Patient, pools, beds, queues, State)
//! - **arrivals**: Arrival stream and classification
//! - **service**: Service-time distributions
//! - **allocation**: Zone preferences, backfill and drain precedence
//! - **orchestrator**: Event loop, handlers, replications
//! - **stats**: Time-weighted statistics and reports
//! - **rng**: Deterministic random variates
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG or scripted draws)
//! 2. Every live patient is in exactly one place
//! 3. Pools and beds never exceed capacity; the clock never runs backwards
//! 4. FFI boundary is minimal and speaks JSON

// Module declarations
pub mod allocation;
pub mod arrivals;
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod service;
pub mod stats;

// Re-exports for convenience
pub use arrivals::ArrivalConfig;
pub use crate::core::time::{SimClock, SimTime};
pub use events::{Event, EventKind, FutureEventList};
pub use models::{
    event::{EventLog, EventRecord},
    patient::{ArrivalMode, Bucket, Patient, PatientId, PatientLocation, TriageClass, Zone},
    state::SimulationState,
};
pub use orchestrator::{
    fingerprint, run_replication, run_replications, Simulation, SimulationConfig,
    SimulationError,
};
pub use rng::{RngManager, ScriptedVariates, VariateSource};
pub use service::ServiceConfig;
pub use stats::{AveragedResult, QueueMetrics, ReplicationResult, ResourceMetrics};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn ed_simulator_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PySimulation>()?;
    m.add_function(wrap_pyfunction!(ffi::run_replication, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::run_replications, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::fingerprint, m)?)?;
    Ok(())
}
