//! Loadwatch fleet engine.
//!
//! Runtime shell around `loadwatch_core`: the [`FleetStore`] owns the
//! trip collection behind a single lock, the [`simulator`] loop moves
//! in-transit vehicles on a fixed interval, and [`geolocate`] supplies
//! the injectable GPS capability used during proof-of-delivery capture.

pub mod geolocate;
pub mod simulator;
pub mod store;

pub use geolocate::{capture_fix, GeolocationProvider, SimulatedGeolocation, GPS_CAPTURE_TIMEOUT};
pub use store::{FleetStore, TickReport};
