//! Schedule health classification and dispatch-board ordering.
//!
//! Every trip carries a coarse schedule flag that drives triage on the
//! dispatch board: late loads surface first, then at-risk, then on-time.
//! Ordering within a band is left untouched so the board does not
//! reshuffle on every refresh.

use serde::{Deserialize, Serialize};

use crate::trip::Trip;
use crate::types::Timestamp;

/// Delay at or beyond this many minutes flags a trip as at risk.
pub const AT_RISK_THRESHOLD_MIN: i64 = 1;
/// Delay at or beyond this many minutes flags a trip as late.
pub const LATE_THRESHOLD_MIN: i64 = 30;

/// Coarse schedule health for one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    OnTime,
    AtRisk,
    Late,
}

impl ScheduleStatus {
    /// Sort rank for the dispatch board. Lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            ScheduleStatus::Late => 0,
            ScheduleStatus::AtRisk => 1,
            ScheduleStatus::OnTime => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScheduleStatus::OnTime => "on-time",
            ScheduleStatus::AtRisk => "at-risk",
            ScheduleStatus::Late => "late",
        }
    }

    /// Classify from minutes behind schedule. Negative values mean the
    /// trip is running ahead.
    pub fn from_delay_minutes(delay: i64) -> Self {
        if delay >= LATE_THRESHOLD_MIN {
            ScheduleStatus::Late
        } else if delay >= AT_RISK_THRESHOLD_MIN {
            ScheduleStatus::AtRisk
        } else {
            ScheduleStatus::OnTime
        }
    }
}

/// Classify a trip against the clock.
///
/// The reference point is the stop currently being serviced, or the
/// first pending stop for a trip not yet underway. Returns `None` when
/// every stop is finished; a completed trip keeps whatever flag it
/// ended with.
pub fn classify_trip(trip: &Trip, now: Timestamp) -> Option<ScheduleStatus> {
    let reference = trip
        .active_stop()
        .or_else(|| trip.stops.iter().find(|s| !s.status.is_terminal()))?;
    let delay = (now - reference.scheduled_time).num_minutes();
    Some(ScheduleStatus::from_delay_minutes(delay))
}

/// Order trips for the dispatch board: late, then at-risk, then on-time.
///
/// The sort is stable, so trips sharing a band keep their incoming
/// relative order.
pub fn sort_by_schedule_priority(trips: &mut [Trip]) {
    trips.sort_by_key(|t| t.schedule_status.priority());
}
