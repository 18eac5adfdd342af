//! Orchestrator - the event loop and everything that drives it
//!
//! - `engine`: configuration, errors and the [`Simulation`] loop
//! - `handlers`: one handler per event kind (arrival, triage, workup, specialist)
//! - `replication`: seeded batches of independent replications
//! - `fingerprint`: SHA-256 digests of canonical JSON for determinism checks

pub mod engine;
pub mod fingerprint;
mod handlers;
pub mod replication;

pub use engine::{run_replication, Simulation, SimulationConfig, SimulationError};
pub use fingerprint::{canonical_json, fingerprint};
pub use replication::{replication_seeds, run_replication_batch, run_replications};
