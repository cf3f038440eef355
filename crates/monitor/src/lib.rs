//! Supporting modules for the `loadwatch-monitor` demo daemon.

pub mod autopilot;
pub mod config;
pub mod eventlog;
pub mod fixtures;
pub mod summary;
