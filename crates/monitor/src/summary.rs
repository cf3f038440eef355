//! Periodic fleet board snapshot in the log.
//!
//! Every interval the whole board is listed in dispatch order and one
//! line per trip lands at info, so a terminal tail of the daemon shows
//! the same picture the dashboard would.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use loadwatch_core::filter::TripFilter;
use loadwatch_engine::FleetStore;

/// Run the summary loop until `cancel` is triggered.
pub async fn run(store: Arc<FleetStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Fleet summary started");

    let mut ticker = tokio::time::interval(interval);
    // The zeroth tick fires immediately; skip it so the first board
    // lands after the fleet has been dispatched.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Fleet summary stopping");
                break;
            }
            _ = ticker.tick() => {
                log_board(&store).await;
            }
        }
    }
}

/// One line per trip, late trips first.
async fn log_board(store: &FleetStore) {
    let board = store.list_trips(&TripFilter::default()).await;
    for trip in &board {
        tracing::info!(
            trip_id = %trip.id,
            driver = %trip.driver_name,
            status = trip.status.label(),
            schedule = trip.schedule_status.label(),
            progress = trip.progress(),
            completed_stops = trip.completed_stops,
            total_stops = trip.total_stops,
            delivered_units = trip.delivered_units,
            total_units = trip.total_units,
            "Fleet board"
        );
    }
}
