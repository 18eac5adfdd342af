//! Core time keeping for the simulation

pub mod time;
