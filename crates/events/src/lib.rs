//! Loadwatch event bus.
//!
//! Building blocks for the engine's in-process event system:
//!
//! - [`EventBus`]: publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`FleetEvent`]: the canonical domain event envelope, with
//!   [`FleetEventKind`] naming the four things that can happen to a
//!   trip.

pub mod bus;

pub use bus::{EventBus, FleetEvent, FleetEventKind};
