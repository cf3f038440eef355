//! The pure movement step behind the position simulator.
//!
//! Each tick nudges an in-transit trip toward its in-progress stop by a
//! caller-chosen fraction of the remaining straight-line distance. The
//! step never overshoots: interpolation by a fraction below 1 always
//! lands short of the target, and inside the arrival radius the vehicle
//! holds still until the driver completes the stop. Randomness stays
//! with the caller so the step itself is deterministic and testable.

use serde::{Deserialize, Serialize};

use crate::trip::{StopStatus, Trip};

/// Smallest share of the remaining distance covered per tick.
pub const MIN_STEP_FRACTION: f64 = 0.02;
/// Largest share of the remaining distance covered per tick.
pub const MAX_STEP_FRACTION: f64 = 0.05;
/// Distance in degrees at which a vehicle counts as arrived.
pub const ARRIVAL_THRESHOLD_DEG: f64 = 0.1;

/// What one movement step did to a trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum StepOutcome {
    /// Moved toward the stop; still outside the arrival radius.
    Moved { remaining_deg: f64 },
    /// Crossed into the arrival radius on this step.
    Arrived { stop_order: u32 },
    /// Already inside the radius, waiting for the stop to be completed.
    Holding,
    /// Nothing to head for: the trip has no in-progress stop.
    NoActiveStop,
}

/// Advance one trip by one tick.
///
/// `fraction` is clamped to `MIN_STEP_FRACTION..=MAX_STEP_FRACTION`
/// before use. Only `current_position` is ever written; arrival
/// bookkeeping and every stop transition belong to the completion
/// workflow. Trips without an in-progress stop (not yet dispatched,
/// finished, or inconsistent) are left untouched, the caller decides
/// whether that deserves a warning.
pub fn simulation_step(trip: &mut Trip, fraction: f64) -> StepOutcome {
    let Some(active_index) = trip
        .stops
        .iter()
        .position(|s| s.status == StopStatus::InProgress)
    else {
        return StepOutcome::NoActiveStop;
    };

    let target = trip.stops[active_index].location.position;
    let remaining = trip.current_position.distance_deg(&target);
    if remaining <= ARRIVAL_THRESHOLD_DEG {
        return StepOutcome::Holding;
    }

    let fraction = fraction.clamp(MIN_STEP_FRACTION, MAX_STEP_FRACTION);
    trip.current_position = trip.current_position.lerp_toward(&target, fraction);

    let remaining = trip.current_position.distance_deg(&target);
    if remaining <= ARRIVAL_THRESHOLD_DEG {
        StepOutcome::Arrived {
            stop_order: trip.stops[active_index].order,
        }
    } else {
        StepOutcome::Moved {
            remaining_deg: remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dispatched_trip, two_stop_trip};
    use crate::trip::TripStatus;
    use assert_matches::assert_matches;

    #[test]
    fn step_shrinks_remaining_distance_by_the_fraction() {
        let mut trip = dispatched_trip("TRP-1");
        let target = trip.stops[0].location.position;
        let before = trip.current_position.distance_deg(&target);

        let outcome = simulation_step(&mut trip, 0.05);
        let after = trip.current_position.distance_deg(&target);

        assert_matches!(outcome, StepOutcome::Moved { .. });
        assert!((after - before * 0.95).abs() < 1e-9);
    }

    #[test]
    fn fraction_is_clamped_to_the_band() {
        let mut fast = dispatched_trip("TRP-1");
        let mut slow = dispatched_trip("TRP-2");
        let target = fast.stops[0].location.position;
        let before = fast.current_position.distance_deg(&target);

        simulation_step(&mut fast, 0.9);
        simulation_step(&mut slow, 0.0001);

        let fast_after = fast.current_position.distance_deg(&target);
        let slow_after = slow.current_position.distance_deg(&target);
        assert!((fast_after - before * (1.0 - MAX_STEP_FRACTION)).abs() < 1e-9);
        assert!((slow_after - before * (1.0 - MIN_STEP_FRACTION)).abs() < 1e-9);
    }

    #[test]
    fn movement_heads_straight_for_the_stop() {
        let mut trip = dispatched_trip("TRP-1");
        let start = trip.current_position;
        let target = trip.stops[0].location.position;

        simulation_step(&mut trip, 0.05);

        // The new point stays on the segment between start and target.
        let full_lat = target.latitude - start.latitude;
        let full_lng = target.longitude - start.longitude;
        let step_lat = trip.current_position.latitude - start.latitude;
        let step_lng = trip.current_position.longitude - start.longitude;
        assert!((step_lat / full_lat - step_lng / full_lng).abs() < 1e-9);
    }

    #[test]
    fn repeated_steps_never_overshoot() {
        let mut trip = dispatched_trip("TRP-1");
        let target = trip.stops[0].location.position;
        let mut previous = trip.current_position.distance_deg(&target);

        for _ in 0..1000 {
            simulation_step(&mut trip, MAX_STEP_FRACTION);
            let remaining = trip.current_position.distance_deg(&target);
            assert!(remaining <= previous);
            previous = remaining;
        }
    }

    #[test]
    fn converges_into_the_arrival_radius() {
        let mut trip = dispatched_trip("TRP-1");
        let target = trip.stops[0].location.position;

        let mut arrived = false;
        for _ in 0..600 {
            match simulation_step(&mut trip, MIN_STEP_FRACTION) {
                StepOutcome::Arrived { stop_order } => {
                    assert_eq!(stop_order, 1);
                    arrived = true;
                    break;
                }
                StepOutcome::Moved { .. } => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert!(arrived, "vehicle should reach the stop at the minimum pace");
        assert!(trip.current_position.distance_deg(&target) <= ARRIVAL_THRESHOLD_DEG);
    }

    #[test]
    fn the_step_writes_nothing_but_the_position() {
        let mut trip = dispatched_trip("TRP-1");
        for _ in 0..600 {
            if matches!(
                simulation_step(&mut trip, MAX_STEP_FRACTION),
                StepOutcome::Arrived { .. }
            ) {
                break;
            }
        }

        // Arrival is reported, never recorded; the stop stays in progress
        // and unstamped until the completion workflow takes over.
        assert_eq!(trip.stops[0].status, StopStatus::InProgress);
        assert!(trip.stops[0].actual_arrival.is_none());
        assert_matches!(
            simulation_step(&mut trip, MAX_STEP_FRACTION),
            StepOutcome::Holding
        );
    }

    #[test]
    fn holding_inside_the_radius_does_not_move() {
        let mut trip = dispatched_trip("TRP-1");
        trip.current_position = trip.stops[0].location.position;

        let outcome = simulation_step(&mut trip, MAX_STEP_FRACTION);

        assert_matches!(outcome, StepOutcome::Holding);
        assert_eq!(trip.current_position, trip.stops[0].location.position);
    }

    #[test]
    fn trip_without_active_stop_is_left_alone() {
        let mut trip = two_stop_trip("TRP-1");
        let before = trip.current_position;
        assert_matches!(simulation_step(&mut trip, 0.05), StepOutcome::NoActiveStop);
        assert_eq!(trip.current_position, before);

        let mut inconsistent = two_stop_trip("TRP-2");
        inconsistent.status = TripStatus::InTransit;
        assert_matches!(
            simulation_step(&mut inconsistent, 0.05),
            StepOutcome::NoActiveStop
        );
    }
}
