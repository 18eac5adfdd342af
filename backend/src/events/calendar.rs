//! Future event list (FEL)
//!
//! Backed by an ordered map keyed on `(time, sequence)`. The sequence number
//! is a per-list insertion counter, so simultaneous events fire in the order
//! they were scheduled. The ordered map also gives preemption a time-ordered
//! scan with direct removal.

use crate::core::time::{SimClock, SimTime};
use crate::events::types::Event;
use crate::orchestrator::SimulationError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct EventKey {
    time: SimTime,
    sequence: u64,
}

/// Time-ordered pending events plus the simulation clock
///
/// # Example
/// ```
/// use ed_simulator_core::core::time::SimTime;
/// use ed_simulator_core::events::{Event, EventKind, FutureEventList};
///
/// let mut fel = FutureEventList::new();
/// fel.schedule(Event::new(SimTime::new(5.0).unwrap(), EventKind::Arrival)).unwrap();
/// fel.schedule(Event::new(SimTime::new(1.0).unwrap(), EventKind::Arrival)).unwrap();
///
/// let first = fel.pop_earliest().unwrap().unwrap();
/// assert_eq!(first.time().minutes(), 1.0);
/// assert_eq!(fel.now().minutes(), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FutureEventList {
    entries: BTreeMap<EventKey, Event>,
    next_sequence: u64,
    clock: SimClock,
}

impl FutureEventList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time (time of the last popped event)
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Time of the event popped before the current one
    pub fn previous(&self) -> SimTime {
        self.clock.previous()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an event
    ///
    /// # Errors
    /// `InvariantViolation` if the event lies before the current clock.
    pub fn schedule(&mut self, event: Event) -> Result<(), SimulationError> {
        if event.time() < self.clock.now() {
            return Err(SimulationError::InvariantViolation(format!(
                "{} scheduled at {} before clock {}",
                event.event_type(),
                event.time(),
                self.clock.now()
            )));
        }
        let key = EventKey {
            time: event.time(),
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.entries.insert(key, event);
        Ok(())
    }

    /// Remove the earliest event and advance the clock to its time
    ///
    /// Returns `Ok(None)` when the list is empty.
    pub fn pop_earliest(&mut self) -> Result<Option<Event>, SimulationError> {
        match self.entries.pop_first() {
            Some((key, event)) => {
                self.clock.advance_to(key.time)?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    /// Earliest pending event without removing it
    pub fn peek(&self) -> Option<&Event> {
        self.entries.values().next()
    }

    /// Remove and return the earliest pending event matching `predicate`
    ///
    /// Scans in firing order; the clock is not touched.
    pub fn find_and_remove<F>(&mut self, mut predicate: F) -> Option<Event>
    where
        F: FnMut(&Event) -> bool,
    {
        let key = self
            .entries
            .iter()
            .find(|(_, event)| predicate(event))
            .map(|(key, _)| *key)?;
        self.entries.remove(&key)
    }

    /// Pending events in firing order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.values()
    }
}
