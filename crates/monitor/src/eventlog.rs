//! Structured log of everything on the event bus.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use loadwatch_events::{FleetEvent, FleetEventKind};

/// Log events until the bus closes or `cancel` is triggered.
pub async fn run(mut events: broadcast::Receiver<FleetEvent>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event log fell behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
    tracing::info!("Event log stopped");
}

/// Position updates are chatty, so they log at debug; everything else
/// is operator-relevant and logs at info.
fn log_event(event: &FleetEvent) {
    match &event.kind {
        FleetEventKind::TripDispatched { trip_id } => {
            tracing::info!(
                trip_id = %trip_id,
                actor = event.actor.as_deref().unwrap_or("-"),
                "Trip dispatched"
            );
        }
        FleetEventKind::PositionUpdated { trip_id, position } => {
            tracing::debug!(
                trip_id = %trip_id,
                lat = position.latitude,
                lng = position.longitude,
                "Position updated"
            );
        }
        FleetEventKind::StopCompleted {
            trip_id,
            stop_order,
            units_delivered,
        } => {
            tracing::info!(
                trip_id = %trip_id,
                stop_order,
                units_delivered,
                actor = event.actor.as_deref().unwrap_or("-"),
                "Stop completed"
            );
        }
        FleetEventKind::TripCompleted { trip_id } => {
            tracing::info!(trip_id = %trip_id, "Trip completed");
        }
    }
}
