//! Demo fleet seeded at startup.
//!
//! Three trips around the southwest: a multi-drop carrier run, a short
//! rail-ramp shuttle, and a flatbed that is already behind schedule so
//! the board has something to triage.

use chrono::Utc;

use loadwatch_core::geo::GeoPoint;
use loadwatch_core::trip::{
    Stop, StopLocation, StopStatus, StopType, Trip, Unit, UnitStatus,
};

fn stop(
    order: u32,
    stop_type: StopType,
    name: &str,
    address: &str,
    position: GeoPoint,
    unit_ids: &[&str],
    offset_min: i64,
) -> Stop {
    Stop {
        order,
        stop_type,
        status: StopStatus::Pending,
        location: StopLocation {
            name: name.to_string(),
            address: address.to_string(),
            position,
        },
        unit_ids: unit_ids.iter().map(|id| id.to_string()).collect(),
        scheduled_time: Utc::now() + chrono::Duration::minutes(offset_min),
        actual_arrival: None,
        actual_departure: None,
        notes: None,
        pod: None,
    }
}

fn unit(id: &str, make: &str, model: &str, year: u16, color: &str, dest: u32) -> Unit {
    Unit {
        id: id.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        color: color.to_string(),
        destination_stop_order: dest,
        status: UnitStatus::Loaded,
        delivered_at: None,
        signed_by: None,
    }
}

/// Build the demo fleet. Every trip starts scheduled; the autopilot
/// dispatches them.
pub fn demo_fleet() -> Vec<Trip> {
    let carrier_run = Trip::new(
        "TRP-4821",
        "DRV-112",
        "Marcus Webb",
        "9-car open carrier #402",
        vec![
            stop(
                1,
                StopType::Pickup,
                "Port of Long Beach Terminal B",
                "1521 Pier B St, Long Beach, CA",
                GeoPoint::new(33.754, -118.216),
                &["VIN-3021", "VIN-3022", "VIN-3023"],
                20,
            ),
            stop(
                2,
                StopType::Delivery,
                "Riverside Auto Mall",
                "8330 Indiana Ave, Riverside, CA",
                GeoPoint::new(33.948, -117.396),
                &["VIN-3021", "VIN-3022"],
                120,
            ),
            stop(
                3,
                StopType::Delivery,
                "Fontana Logistics Yard",
                "14600 Slover Ave, Fontana, CA",
                GeoPoint::new(34.092, -117.435),
                &["VIN-3023"],
                210,
            ),
        ],
        vec![
            unit("VIN-3021", "Honda", "CR-V", 2024, "Silver", 2),
            unit("VIN-3022", "Toyota", "Camry", 2023, "White", 2),
            unit("VIN-3023", "Kia", "Telluride", 2024, "Gray", 3),
        ],
        GeoPoint::new(33.77, -118.19),
    );

    let rail_shuttle = Trip::new(
        "TRP-4822",
        "DRV-087",
        "Lena Ortiz",
        "6-car stinger #218",
        vec![
            stop(
                1,
                StopType::Pickup,
                "Oakland Rail Ramp",
                "333 Maritime St, Oakland, CA",
                GeoPoint::new(37.804, -122.271),
                &["VIN-5118", "VIN-5119"],
                30,
            ),
            stop(
                2,
                StopType::Delivery,
                "Sacramento Dealer Exchange",
                "2929 Fulton Ave, Sacramento, CA",
                GeoPoint::new(38.582, -121.494),
                &["VIN-5118", "VIN-5119"],
                240,
            ),
        ],
        vec![
            unit("VIN-5118", "Ford", "F-150", 2022, "Blue", 2),
            unit("VIN-5119", "Subaru", "Outback", 2023, "Green", 2),
        ],
        GeoPoint::new(37.77, -122.24),
    );

    // Scheduled in the past so the classifier flags it immediately.
    let flatbed = Trip::new(
        "TRP-4823",
        "DRV-203",
        "Sam Okafor",
        "flatbed #77",
        vec![
            stop(
                1,
                StopType::Pickup,
                "San Diego Harbor Depot",
                "960 Harbor Dr, San Diego, CA",
                GeoPoint::new(32.716, -117.163),
                &["VIN-7440"],
                -45,
            ),
            stop(
                2,
                StopType::Delivery,
                "Phoenix West Lot",
                "4025 W Buckeye Rd, Phoenix, AZ",
                GeoPoint::new(33.448, -112.074),
                &["VIN-7440"],
                60,
            ),
        ],
        vec![unit("VIN-7440", "Ram", "2500", 2021, "Black", 2)],
        GeoPoint::new(32.74, -117.12),
    );

    vec![carrier_run, rail_shuttle, flatbed]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_fleet_is_sound() {
        let fleet = demo_fleet();
        assert_eq!(fleet.len(), 3);
        for trip in &fleet {
            let violations = trip.validate();
            assert!(
                violations.is_empty(),
                "{} should validate, got {violations:?}",
                trip.id
            );
        }
    }

    #[test]
    fn demo_ids_are_unique() {
        let fleet = demo_fleet();
        let mut ids: Vec<&str> = fleet.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), fleet.len());
    }
}
