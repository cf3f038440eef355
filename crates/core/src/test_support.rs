//! Shared fixtures for the unit tests in this crate.

use chrono::TimeZone;

use crate::geo::GeoPoint;
use crate::trip::{
    Stop, StopLocation, StopStatus, StopType, Trip, TripStatus, Unit, UnitStatus,
};
use crate::types::Timestamp;

/// Fixed reference instant so fixtures are deterministic.
pub fn base_time() -> Timestamp {
    chrono::Utc
        .with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
        .single()
        .expect("fixture timestamp should be valid")
}

fn stop(order: u32, stop_type: StopType, unit_ids: &[&str]) -> Stop {
    Stop {
        order,
        stop_type,
        status: StopStatus::Pending,
        location: StopLocation {
            name: format!("Depot {order}"),
            address: format!("{order}00 Industrial Way"),
            position: GeoPoint::new(34.0 + order as f64, -118.0 - order as f64),
        },
        unit_ids: unit_ids.iter().map(|id| id.to_string()).collect(),
        scheduled_time: base_time() + chrono::Duration::hours(order as i64),
        actual_arrival: None,
        actual_departure: None,
        notes: None,
        pod: None,
    }
}

pub fn pickup_stop(order: u32, unit_ids: &[&str]) -> Stop {
    stop(order, StopType::Pickup, unit_ids)
}

pub fn delivery_stop(order: u32, unit_ids: &[&str]) -> Stop {
    stop(order, StopType::Delivery, unit_ids)
}

pub fn unit(id: &str, destination_stop_order: u32) -> Unit {
    Unit {
        id: id.to_string(),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        year: 2021,
        color: "Silver".to_string(),
        destination_stop_order,
        status: UnitStatus::Loaded,
        delivered_at: None,
        signed_by: None,
    }
}

/// A freshly scheduled trip: pickup at stop 1, delivery of both units
/// at stop 2.
pub fn two_stop_trip(id: &str) -> Trip {
    Trip::new(
        id,
        "DRV-1",
        "Avery Cole",
        "9-car open carrier #402",
        vec![pickup_stop(1, &["U1", "U2"]), delivery_stop(2, &["U1", "U2"])],
        vec![unit("U1", 2), unit("U2", 2)],
        GeoPoint::new(34.0, -118.0),
    )
}

/// The `two_stop_trip` fixture just after dispatch: stop 1 in progress,
/// nothing serviced yet.
pub fn dispatched_trip(id: &str) -> Trip {
    let mut trip = two_stop_trip(id);
    trip.status = TripStatus::InTransit;
    trip.stops[0].status = StopStatus::InProgress;
    trip.current_stop_index = 0;
    trip.recount();
    trip
}

/// The `two_stop_trip` fixture advanced mid-route: pickup done, the
/// delivery stop in progress, units riding along.
pub fn in_transit_trip(id: &str) -> Trip {
    let mut trip = two_stop_trip(id);
    trip.status = TripStatus::InTransit;
    trip.stops[0].status = StopStatus::Completed;
    trip.stops[0].actual_arrival = Some(base_time() + chrono::Duration::hours(1));
    trip.stops[0].actual_departure = Some(base_time() + chrono::Duration::minutes(80));
    trip.stops[1].status = StopStatus::InProgress;
    trip.current_stop_index = 1;
    for unit in &mut trip.units {
        unit.status = UnitStatus::InTransit;
    }
    trip.recount();
    trip
}
