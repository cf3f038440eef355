//! Plays the drivers.
//!
//! On a fixed interval the autopilot refreshes every trip's schedule
//! flag and, when enabled, completes any stop whose vehicle has
//! arrived: it captures a simulated GPS fix, assembles a valid
//! proof-of-delivery package, and submits it through the store exactly
//! like a driver app would.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use loadwatch_core::filter::TripFilter;
use loadwatch_core::geo::GeoFix;
use loadwatch_core::movement::ARRIVAL_THRESHOLD_DEG;
use loadwatch_core::pod::{
    ConditionReport, PhotoCategory, PodPackage, PodPhoto, Signature,
};
use loadwatch_core::trip::{Trip, TripStatus};
use loadwatch_engine::{capture_fix, FleetStore, SimulatedGeolocation};

/// Receivers who sign for the demo deliveries.
const RECEIVERS: [&str; 4] = ["Dana Ellis", "R. Vega", "Priya Shah", "T. Nakamura"];

/// Run the autopilot loop until `cancel` is triggered.
pub async fn run(
    store: Arc<FleetStore>,
    sweep_interval: Duration,
    gps_timeout: Duration,
    auto_deliver: bool,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = sweep_interval.as_secs(),
        auto_deliver,
        "Autopilot started"
    );

    let mut interval = tokio::time::interval(sweep_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Autopilot stopping");
                break;
            }
            _ = interval.tick() => {
                sweep(&store, gps_timeout, auto_deliver).await;
            }
        }
    }
}

/// One pass over the fleet: reflag schedules, then complete arrivals.
async fn sweep(store: &FleetStore, gps_timeout: Duration, auto_deliver: bool) {
    let changed = store.refresh_schedule_statuses().await;
    if changed > 0 {
        tracing::info!(changed, "Schedule flags refreshed");
    }

    if !auto_deliver {
        return;
    }

    let in_transit = store
        .list_trips(&TripFilter {
            status: Some(TripStatus::InTransit),
            ..TripFilter::default()
        })
        .await;

    for trip in in_transit {
        // Inconsistent trips are already warned about by the tick.
        let Some(active) = trip.active_stop() else {
            continue;
        };
        let remaining = trip
            .current_position
            .distance_deg(&active.location.position);
        if remaining > ARRIVAL_THRESHOLD_DEG {
            continue;
        }

        let provider = SimulatedGeolocation::at(trip.current_position);
        let fix = capture_fix(&provider, gps_timeout).await;
        let pod = build_pod(&trip, active.order, fix);

        match store
            .complete_stop(&trip.id, active.order, pod, Some(&trip.driver_id))
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    trip_id = %updated.id,
                    stop_order = active.order,
                    progress = updated.progress(),
                    "Autopilot completed a stop"
                );
            }
            Err(e) => {
                tracing::warn!(trip_id = %trip.id, error = %e, "Autopilot completion rejected");
            }
        }
    }
}

/// Assemble a package that passes every validation check.
fn build_pod(trip: &Trip, stop_order: u32, fix: Option<GeoFix>) -> PodPackage {
    let mut rng = rand::rng();
    let receiver = RECEIVERS[rng.random_range(0..RECEIVERS.len())];

    PodPackage {
        confirmed_units: trip
            .units_for_stop(stop_order)
            .iter()
            .map(|u| u.id.clone())
            .collect(),
        photos: vec![
            PodPhoto {
                category: PhotoCategory::Unit,
                image_ref: format!("photos/{}.jpg", uuid::Uuid::new_v4()),
                taken_at: Utc::now(),
            },
            PodPhoto {
                category: PhotoCategory::Paperwork,
                image_ref: format!("photos/{}.jpg", uuid::Uuid::new_v4()),
                taken_at: Utc::now(),
            },
        ],
        signature: Some(Signature {
            receiver_name: receiver.to_string(),
            captured_at: Utc::now(),
            image_ref: format!("signatures/{}.png", uuid::Uuid::new_v4()),
        }),
        condition_report: Some(ConditionReport::default()),
        gps_fix: fix,
    }
}
