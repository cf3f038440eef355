//! Periodic position simulation loop.
//!
//! Spawns nothing itself: callers `tokio::spawn(simulator::run(...))`
//! and cancel it through the token on shutdown. Every tick asks the
//! store to advance the fleet; the store serializes the sweep against
//! driver commands.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::FleetStore;

/// How often vehicles move when no interval is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Run the simulation loop until `cancel` is triggered.
pub async fn run(store: Arc<FleetStore>, tick_interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = tick_interval.as_secs(),
        "Position simulator started"
    );

    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Position simulator stopping");
                break;
            }
            _ = interval.tick() => {
                let report = store.tick().await;
                if report.skipped > 0 {
                    tracing::warn!(
                        skipped = report.skipped,
                        "Tick skipped trips with inconsistent state"
                    );
                }
                tracing::debug!(
                    moved = report.moved,
                    holding = report.holding,
                    "Simulation tick complete"
                );
            }
        }
    }
}
