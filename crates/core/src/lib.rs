//! Domain model for the loadwatch fleet engine.
//!
//! Pure types and transforms only: trips, stops and units with their
//! state machines, proof-of-delivery validation and the stop completion
//! workflow, the movement step behind the position simulator, schedule
//! classification and dispatch-board filtering. Nothing in this crate
//! does I/O or spawns tasks; transforms take their timestamps and step
//! fractions from the caller, which keeps them unit-testable.

pub mod error;
pub mod filter;
pub mod geo;
pub mod movement;
pub mod pod;
pub mod schedule;
pub mod trip;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CoreError;
pub use geo::{GeoFix, GeoPoint};
pub use trip::{Stop, StopStatus, StopType, Trip, TripStatus, Unit, UnitStatus};
