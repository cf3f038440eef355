//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`FleetEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the engine and any
//! observers, e.g. the monitor's event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use loadwatch_core::geo::GeoPoint;
use loadwatch_core::types::TripId;

// ---------------------------------------------------------------------------
// FleetEvent
// ---------------------------------------------------------------------------

/// What happened to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum FleetEventKind {
    /// A scheduled trip went on the road.
    TripDispatched { trip_id: TripId },
    /// The simulator moved a vehicle.
    PositionUpdated { trip_id: TripId, position: GeoPoint },
    /// A stop was completed with an accepted proof of delivery.
    StopCompleted {
        trip_id: TripId,
        stop_order: u32,
        units_delivered: u32,
    },
    /// The final stop finished and the trip closed out.
    TripCompleted { trip_id: TripId },
}

impl FleetEventKind {
    /// Stable kebab-case event name, e.g. `"stop-completed"`.
    pub fn name(&self) -> &'static str {
        match self {
            FleetEventKind::TripDispatched { .. } => "trip-dispatched",
            FleetEventKind::PositionUpdated { .. } => "position-updated",
            FleetEventKind::StopCompleted { .. } => "stop-completed",
            FleetEventKind::TripCompleted { .. } => "trip-completed",
        }
    }

    /// The trip the event concerns.
    pub fn trip_id(&self) -> &str {
        match self {
            FleetEventKind::TripDispatched { trip_id }
            | FleetEventKind::PositionUpdated { trip_id, .. }
            | FleetEventKind::StopCompleted { trip_id, .. }
            | FleetEventKind::TripCompleted { trip_id } => trip_id,
        }
    }
}

/// A domain event with its envelope.
///
/// Constructed via [`FleetEvent::new`] and optionally enriched with
/// [`with_actor`](FleetEvent::with_actor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEvent {
    #[serde(flatten)]
    pub kind: FleetEventKind,

    /// Who triggered the event, when a person did.
    pub actor: Option<String>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl FleetEvent {
    pub fn new(kind: FleetEventKind) -> Self {
        Self {
            kind,
            actor: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`FleetEvent`].
///
/// # Usage
///
/// ```rust
/// use loadwatch_events::bus::{EventBus, FleetEvent, FleetEventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(FleetEvent::new(FleetEventKind::TripDispatched {
///     trip_id: "TRP-1".into(),
/// }));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<FleetEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: FleetEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
