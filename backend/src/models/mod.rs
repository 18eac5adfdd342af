//! Domain models for the emergency department simulator

pub mod event;
pub mod patient;
pub mod queues;
pub mod resources;
pub mod state;

// Re-exports
pub use event::{EventLog, EventRecord};
pub use patient::{ArrivalMode, Bucket, Patient, PatientId, PatientLocation, TriageClass, Zone};
pub use queues::{BucketQueues, WaitQueues};
pub use resources::{ResourceKind, ResourcePool, ZoneBeds};
pub use state::SimulationState;
