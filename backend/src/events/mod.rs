//! Scheduled events and the future event list
//!
//! # Design Principles
//!
//! 1. **Sum type**: four event kinds share a time field, departures carry a patient
//! 2. **Stable ties**: equal times pop in insertion order
//! 3. **Cancellation only by preemption**: `find_and_remove` is the sole way an
//!    event leaves the list without firing

pub mod calendar;
pub mod types;

pub use calendar::FutureEventList;
pub use types::{Event, EventKind};
