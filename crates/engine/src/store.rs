//! The fleet store: single serialized owner of the trip collection.
//!
//! [`FleetStore`] holds every trip behind one `tokio::sync::RwLock`, so
//! the periodic simulation tick and driver commands never interleave
//! mid-transform: each mutation takes the write guard, applies a pure
//! transform from `loadwatch_core`, and stores the result before anyone
//! else can observe it. Reads hand out clones, never references into
//! the guarded map.
//!
//! Domain events are broadcast via a shared [`EventBus`]. Publishing
//! happens after the guard is released so subscribers can re-enter the
//! store from their handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::RwLock;

use loadwatch_core::error::CoreError;
use loadwatch_core::filter::TripFilter;
use loadwatch_core::movement::{
    simulation_step, StepOutcome, MAX_STEP_FRACTION, MIN_STEP_FRACTION,
};
use loadwatch_core::pod::{complete_stop, PodPackage, PodRequirements};
use loadwatch_core::schedule::{classify_trip, sort_by_schedule_priority};
use loadwatch_core::trip::{Trip, TripStatus, Unit};
use loadwatch_core::types::TripId;
use loadwatch_events::{EventBus, FleetEvent, FleetEventKind};

/// What one simulation tick did across the fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Trips moved toward their stop (including arrivals).
    pub moved: usize,
    /// Trips already inside the arrival radius, waiting on the driver.
    pub holding: usize,
    /// In-transit trips with no in-progress stop, logged and left alone.
    pub skipped: usize,
}

/// Serialized owner of the trip collection.
///
/// Created once at startup and shared as `Arc<FleetStore>` between the
/// simulator task and whatever surface issues commands.
pub struct FleetStore {
    trips: RwLock<BTreeMap<TripId, Trip>>,
    bus: Arc<EventBus>,
    requirements: PodRequirements,
}

impl FleetStore {
    pub fn new(bus: Arc<EventBus>, requirements: PodRequirements) -> Self {
        Self {
            trips: RwLock::new(BTreeMap::new()),
            bus,
            requirements,
        }
    }

    // -----------------------------------------------------------------
    // Ingest
    // -----------------------------------------------------------------

    /// Add one trip, rejecting duplicates and invalid records.
    pub async fn insert_trip(&self, trip: Trip) -> Result<(), CoreError> {
        let violations = trip.validate();
        if !violations.is_empty() {
            return Err(CoreError::Validation(violations.join("; ")));
        }

        let mut trips = self.trips.write().await;
        if trips.contains_key(&trip.id) {
            return Err(CoreError::Conflict(format!(
                "Trip {} already exists",
                trip.id
            )));
        }
        trips.insert(trip.id.clone(), trip);
        Ok(())
    }

    /// Bulk-load a fleet, skipping records that fail validation.
    ///
    /// A malformed trip is logged and dropped rather than poisoning the
    /// batch. Returns how many trips made it in.
    pub async fn load_fleet(&self, incoming: Vec<Trip>) -> usize {
        let mut loaded = 0;
        for trip in incoming {
            let trip_id = trip.id.clone();
            match self.insert_trip(trip).await {
                Ok(()) => loaded += 1,
                Err(e) => {
                    tracing::warn!(trip_id = %trip_id, error = %e, "Skipping trip on load");
                }
            }
        }
        tracing::info!(loaded, "Fleet loaded");
        loaded
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Fetch one trip by id.
    pub async fn get_trip(&self, trip_id: &str) -> Result<Trip, CoreError> {
        self.trips
            .read()
            .await
            .get(trip_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "trip",
                id: trip_id.to_string(),
            })
    }

    /// List trips matching a filter, in dispatch-board order: late
    /// first, then at-risk, then on-time, stable within each band.
    pub async fn list_trips(&self, filter: &TripFilter) -> Vec<Trip> {
        let trips = self.trips.read().await;
        let mut matched: Vec<Trip> = trips
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        sort_by_schedule_priority(&mut matched);
        matched
    }

    pub async fn trip_count(&self) -> usize {
        self.trips.read().await.len()
    }

    /// Units handled at one stop of one trip.
    pub async fn units_for_stop(
        &self,
        trip_id: &str,
        stop_order: u32,
    ) -> Result<Vec<Unit>, CoreError> {
        let trips = self.trips.read().await;
        let trip = trips.get(trip_id).ok_or_else(|| CoreError::NotFound {
            entity: "trip",
            id: trip_id.to_string(),
        })?;
        Ok(trip
            .units_for_stop(stop_order)
            .into_iter()
            .cloned()
            .collect())
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Put a scheduled trip on the road.
    pub async fn dispatch_trip(
        &self,
        trip_id: &str,
        actor: Option<&str>,
    ) -> Result<Trip, CoreError> {
        let updated = {
            let mut trips = self.trips.write().await;
            let trip = trips.get(trip_id).ok_or_else(|| CoreError::NotFound {
                entity: "trip",
                id: trip_id.to_string(),
            })?;
            let updated = trip.dispatch(actor, Utc::now())?;
            trips.insert(updated.id.clone(), updated.clone());
            updated
        };

        tracing::info!(trip_id = %updated.id, driver = %updated.driver_name, "Trip dispatched");
        let mut event = FleetEvent::new(FleetEventKind::TripDispatched {
            trip_id: updated.id.clone(),
        });
        if let Some(actor) = actor {
            event = event.with_actor(actor);
        }
        self.bus.publish(event);
        Ok(updated)
    }

    /// Complete the in-progress stop of a trip with a proof-of-delivery
    /// package.
    ///
    /// Validation failures reject the whole command and change nothing;
    /// see [`loadwatch_core::pod::complete_stop`] for the effects of an
    /// accepted package.
    pub async fn complete_stop(
        &self,
        trip_id: &str,
        stop_order: u32,
        pod: PodPackage,
        actor: Option<&str>,
    ) -> Result<Trip, CoreError> {
        let (updated, units_delivered) = {
            let mut trips = self.trips.write().await;
            let trip = trips.get(trip_id).ok_or_else(|| CoreError::NotFound {
                entity: "trip",
                id: trip_id.to_string(),
            })?;
            let updated = complete_stop(trip, stop_order, pod, &self.requirements, actor, Utc::now())?;
            let units_delivered = updated.delivered_units - trip.delivered_units;
            trips.insert(updated.id.clone(), updated.clone());
            (updated, units_delivered)
        };

        tracing::info!(
            trip_id = %updated.id,
            stop_order,
            units_delivered,
            progress = updated.progress(),
            "Stop completed"
        );

        let mut event = FleetEvent::new(FleetEventKind::StopCompleted {
            trip_id: updated.id.clone(),
            stop_order,
            units_delivered,
        });
        if let Some(actor) = actor {
            event = event.with_actor(actor);
        }
        self.bus.publish(event);

        if updated.status == TripStatus::Completed {
            tracing::info!(trip_id = %updated.id, "Trip completed");
            self.bus.publish(FleetEvent::new(FleetEventKind::TripCompleted {
                trip_id: updated.id.clone(),
            }));
        }

        Ok(updated)
    }

    /// Advance every in-transit trip by one simulation step.
    ///
    /// Each trip moves by a freshly drawn 2-5% of its remaining
    /// distance. The whole sweep happens under one write guard, so a
    /// concurrent `complete_stop` observes either the fleet before the
    /// tick or after it, never a half-moved fleet.
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();
        let mut events = Vec::new();

        {
            let mut trips = self.trips.write().await;
            let mut rng = rand::rng();
            for trip in trips.values_mut() {
                if trip.status != TripStatus::InTransit {
                    continue;
                }
                let fraction = rng.random_range(MIN_STEP_FRACTION..=MAX_STEP_FRACTION);
                match simulation_step(trip, fraction) {
                    StepOutcome::Moved { .. } => {
                        report.moved += 1;
                        events.push(FleetEvent::new(FleetEventKind::PositionUpdated {
                            trip_id: trip.id.clone(),
                            position: trip.current_position,
                        }));
                    }
                    StepOutcome::Arrived { stop_order } => {
                        report.moved += 1;
                        tracing::info!(trip_id = %trip.id, stop_order, "Vehicle arrived at its stop");
                        events.push(FleetEvent::new(FleetEventKind::PositionUpdated {
                            trip_id: trip.id.clone(),
                            position: trip.current_position,
                        }));
                    }
                    StepOutcome::Holding => {
                        report.holding += 1;
                    }
                    StepOutcome::NoActiveStop => {
                        report.skipped += 1;
                        tracing::warn!(
                            trip_id = %trip.id,
                            "In-transit trip has no in-progress stop; skipping"
                        );
                    }
                }
            }
        }

        for event in events {
            self.bus.publish(event);
        }
        report
    }

    /// Re-derive the schedule flag of every unfinished trip from the
    /// clock. Returns how many flags changed.
    pub async fn refresh_schedule_statuses(&self) -> usize {
        let now = Utc::now();
        let mut changed = 0;
        let mut trips = self.trips.write().await;
        for trip in trips.values_mut() {
            if trip.status == TripStatus::Completed {
                continue;
            }
            if let Some(status) = classify_trip(trip, now) {
                if status != trip.schedule_status {
                    tracing::debug!(
                        trip_id = %trip.id,
                        from = trip.schedule_status.label(),
                        to = status.label(),
                        "Schedule status changed"
                    );
                    trip.schedule_status = status;
                    changed += 1;
                }
            }
        }
        changed
    }
}
