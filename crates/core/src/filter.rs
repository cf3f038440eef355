//! Dispatch-board filtering over the fleet.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleStatus;
use crate::trip::{Trip, TripStatus};

/// Route-size bands used by the board's stop-count filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopCountBucket {
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6+")]
    SixPlus,
}

impl StopCountBucket {
    pub fn contains(self, stop_count: u32) -> bool {
        match self {
            StopCountBucket::OneToTwo => (1..=2).contains(&stop_count),
            StopCountBucket::ThreeToFive => (3..=5).contains(&stop_count),
            StopCountBucket::SixPlus => stop_count >= 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StopCountBucket::OneToTwo => "1-2",
            StopCountBucket::ThreeToFive => "3-5",
            StopCountBucket::SixPlus => "6+",
        }
    }
}

/// Criteria for listing trips. Absent fields match everything.
///
/// Present criteria are conjunctive: a trip must satisfy all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub schedule_status: Option<ScheduleStatus>,
    pub stop_bucket: Option<StopCountBucket>,
    /// Case-insensitive substring over trip id, driver and vehicle.
    pub search: Option<String>,
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(status) = self.status {
            if trip.status != status {
                return false;
            }
        }
        if let Some(schedule) = self.schedule_status {
            if trip.schedule_status != schedule {
                return false;
            }
        }
        if let Some(bucket) = self.stop_bucket {
            if !bucket.contains(trip.total_stops) {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref() {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = trip.id.to_lowercase().contains(&needle)
                    || trip.driver_name.to_lowercase().contains(&needle)
                    || trip.driver_id.to_lowercase().contains(&needle)
                    || trip.vehicle.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dispatched_trip, two_stop_trip};

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TripFilter::default().matches(&two_stop_trip("TRP-1")));
        assert!(TripFilter::default().matches(&dispatched_trip("TRP-2")));
    }

    #[test]
    fn status_filter() {
        let filter = TripFilter {
            status: Some(TripStatus::InTransit),
            ..TripFilter::default()
        };
        assert!(filter.matches(&dispatched_trip("TRP-1")));
        assert!(!filter.matches(&two_stop_trip("TRP-2")));
    }

    #[test]
    fn schedule_status_filter() {
        let mut late = two_stop_trip("TRP-1");
        late.schedule_status = ScheduleStatus::Late;
        let filter = TripFilter {
            schedule_status: Some(ScheduleStatus::Late),
            ..TripFilter::default()
        };
        assert!(filter.matches(&late));
        assert!(!filter.matches(&two_stop_trip("TRP-2")));
    }

    #[test]
    fn bucket_boundaries() {
        assert!(StopCountBucket::OneToTwo.contains(1));
        assert!(StopCountBucket::OneToTwo.contains(2));
        assert!(!StopCountBucket::OneToTwo.contains(3));
        assert!(StopCountBucket::ThreeToFive.contains(3));
        assert!(StopCountBucket::ThreeToFive.contains(5));
        assert!(!StopCountBucket::ThreeToFive.contains(6));
        assert!(StopCountBucket::SixPlus.contains(6));
        assert!(StopCountBucket::SixPlus.contains(11));
        assert!(!StopCountBucket::SixPlus.contains(5));
    }

    #[test]
    fn bucket_filter_uses_total_stops() {
        let filter = TripFilter {
            stop_bucket: Some(StopCountBucket::OneToTwo),
            ..TripFilter::default()
        };
        assert!(filter.matches(&two_stop_trip("TRP-1")));

        let filter = TripFilter {
            stop_bucket: Some(StopCountBucket::SixPlus),
            ..TripFilter::default()
        };
        assert!(!filter.matches(&two_stop_trip("TRP-2")));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let trip = two_stop_trip("TRP-41");
        for needle in ["trp-41", "avery", "COLE", "carrier", "drv-1"] {
            let filter = TripFilter {
                search: Some(needle.to_string()),
                ..TripFilter::default()
            };
            assert!(filter.matches(&trip), "expected match for {needle:?}");
        }
    }

    #[test]
    fn search_miss_rejects() {
        let filter = TripFilter {
            search: Some("flatbed".to_string()),
            ..TripFilter::default()
        };
        assert!(!filter.matches(&two_stop_trip("TRP-1")));
    }

    #[test]
    fn blank_search_matches_everything() {
        let filter = TripFilter {
            search: Some("   ".to_string()),
            ..TripFilter::default()
        };
        assert!(filter.matches(&two_stop_trip("TRP-1")));
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let trip = dispatched_trip("TRP-1");
        let filter = TripFilter {
            status: Some(TripStatus::InTransit),
            search: Some("avery".to_string()),
            ..TripFilter::default()
        };
        assert!(filter.matches(&trip));

        let filter = TripFilter {
            status: Some(TripStatus::Completed),
            search: Some("avery".to_string()),
            ..TripFilter::default()
        };
        assert!(!filter.matches(&trip));
    }
}
