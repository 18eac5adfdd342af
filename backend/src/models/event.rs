//! Event log for replay and auditing
//!
//! When enabled in the config, the engine records every processed event
//! and the allocation decisions that are otherwise invisible in the
//! aggregate statistics (preemptions, discharges). The log is purely
//! observational; nothing reads it back during a run.

use crate::events::EventKind;
use crate::models::patient::{ArrivalMode, PatientId, Zone};
use serde::{Deserialize, Serialize};

/// One entry in the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum EventRecord {
    /// An event was popped from the FEL and handled
    Processed { time: f64, kind: EventKind },

    /// `preempting` took the doctor serving `preempted`
    Preempted {
        time: f64,
        preempting: PatientId,
        preempted: PatientId,
    },

    /// A patient left the department and freed a bed
    Discharged {
        time: f64,
        patient: PatientId,
        zone: Zone,
        arrival_mode: ArrivalMode,
        /// Minutes from arrival to discharge
        length_of_stay: f64,
    },
}

impl EventRecord {
    pub fn time(&self) -> f64 {
        match self {
            EventRecord::Processed { time, .. } => *time,
            EventRecord::Preempted { time, .. } => *time,
            EventRecord::Discharged { time, .. } => *time,
        }
    }

    pub fn record_type(&self) -> &'static str {
        match self {
            EventRecord::Processed { .. } => "Processed",
            EventRecord::Preempted { .. } => "Preempted",
            EventRecord::Discharged { .. } => "Discharged",
        }
    }
}

/// Append-only list of [`EventRecord`]s
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records of a given type, e.g. `"Preempted"`
    pub fn records_of_type(&self, record_type: &str) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.record_type() == record_type)
            .collect()
    }

    /// Times of all processed events, in processing order
    pub fn processed_times(&self) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| match r {
                EventRecord::Processed { time, .. } => Some(*time),
                _ => None,
            })
            .collect()
    }
}
