//! Event types
//!
//! Events are immutable once scheduled. Only the Arrival carries no
//! patient: the patient is created when the arrival fires.

use crate::core::time::SimTime;
use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};

/// What happens when an event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "patient", rename_all = "snake_case")]
pub enum EventKind {
    /// A new patient reaches the department
    Arrival,
    /// A walk-in finishes triage with a nurse
    TriageDeparture(PatientId),
    /// A patient finishes the doctor workup
    WorkupDeparture(PatientId),
    /// A patient finishes with the specialist and leaves
    SpecialistDeparture(PatientId),
}

/// An event pending on (or popped from) the future event list
///
/// # Example
/// ```
/// use ed_simulator_core::core::time::SimTime;
/// use ed_simulator_core::events::{Event, EventKind};
/// use ed_simulator_core::models::PatientId;
///
/// let e = Event::new(SimTime::new(12.0).unwrap(), EventKind::WorkupDeparture(PatientId(3)));
/// assert_eq!(e.patient(), Some(PatientId(3)));
/// assert_eq!(e.event_type(), "WorkupDeparture");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    time: SimTime,
    kind: EventKind,
}

impl Event {
    pub fn new(time: SimTime, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Patient the event belongs to (None for arrivals)
    pub fn patient(&self) -> Option<PatientId> {
        match self.kind {
            EventKind::Arrival => None,
            EventKind::TriageDeparture(p)
            | EventKind::WorkupDeparture(p)
            | EventKind::SpecialistDeparture(p) => Some(p),
        }
    }

    pub fn is_workup_departure(&self) -> bool {
        matches!(self.kind, EventKind::WorkupDeparture(_))
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            EventKind::Arrival => "Arrival",
            EventKind::TriageDeparture(_) => "TriageDeparture",
            EventKind::WorkupDeparture(_) => "WorkupDeparture",
            EventKind::SpecialistDeparture(_) => "SpecialistDeparture",
        }
    }
}
