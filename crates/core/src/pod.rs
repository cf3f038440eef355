//! Proof-of-delivery capture, validation and the stop completion workflow.
//!
//! A [`PodPackage`] is everything a driver collects at a stop: the unit
//! confirmation checklist, photos, the receiver's signature, an optional
//! condition report and an optional GPS fix. [`validate_pod`] runs every
//! check and reports all failures at once so the driver can fix the whole
//! package in one pass. [`complete_stop`] is the only way a stop reaches
//! `Completed`: it validates first and then applies every effect of the
//! completion, or applies nothing at all.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoFix;
use crate::trip::{StopStatus, StopType, Trip, TripStatus, Unit, UnitStatus};
use crate::types::{Timestamp, UnitId};

// ---------------------------------------------------------------------------
// Capture data model
// ---------------------------------------------------------------------------

/// Minimum photos per package.
pub const MIN_PHOTOS: usize = 2;
/// Minimum receiver name length after trimming.
pub const MIN_RECEIVER_NAME_LEN: usize = 2;

/// What a photo documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoCategory {
    /// The cargo itself, as handed over.
    Unit,
    /// Bill of lading or other signed paperwork.
    Paperwork,
    /// Damage discovered at handover.
    Damage,
    /// Anything else worth keeping.
    Other,
}

/// One captured photo. The bytes live elsewhere; this is the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodPhoto {
    pub category: PhotoCategory,
    /// Opaque reference to the stored image.
    pub image_ref: String,
    pub taken_at: Timestamp,
}

/// The receiver's sign-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub receiver_name: String,
    pub captured_at: Timestamp,
    /// Opaque reference to the drawn signature image.
    pub image_ref: String,
}

/// Condition checklist filled in at handover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub overages: bool,
    pub shortages: bool,
    pub damages: bool,
    pub notes: Option<String>,
}

impl ConditionReport {
    /// Whether any issue flag is set.
    pub fn has_flags(&self) -> bool {
        self.overages || self.shortages || self.damages
    }
}

/// Everything collected at one stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodPackage {
    /// Ids the driver ticked off at handover.
    pub confirmed_units: Vec<UnitId>,
    pub photos: Vec<PodPhoto>,
    pub signature: Option<Signature>,
    pub condition_report: Option<ConditionReport>,
    /// Where the capture happened, when the device could tell us.
    pub gps_fix: Option<GeoFix>,
}

/// Tunable validation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRequirements {
    pub min_photos: usize,
    pub min_receiver_name: usize,
}

impl Default for PodRequirements {
    fn default() -> Self {
        Self {
            min_photos: MIN_PHOTOS,
            min_receiver_name: MIN_RECEIVER_NAME_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// One failed validation check.
///
/// `code` is the stable machine-readable identifier surfaced to clients;
/// `message` is the operator-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum PodCheck {
    MissingUnitsConfirmation,
    MissingUnitPhoto,
    MissingPaperworkPhoto,
    TooFewPhotos { required: usize },
    MissingSignature,
    InvalidReceiverName { min_len: usize },
    MissingConditionNotes,
}

impl PodCheck {
    pub fn code(&self) -> &'static str {
        match self {
            PodCheck::MissingUnitsConfirmation => "missing-units-confirmation",
            PodCheck::MissingUnitPhoto => "missing-unit-photo",
            PodCheck::MissingPaperworkPhoto => "missing-paperwork-photo",
            PodCheck::TooFewPhotos { .. } => "too-few-photos",
            PodCheck::MissingSignature => "missing-signature",
            PodCheck::InvalidReceiverName { .. } => "invalid-receiver-name",
            PodCheck::MissingConditionNotes => "missing-condition-notes",
        }
    }

    pub fn message(&self) -> String {
        match self {
            PodCheck::MissingUnitsConfirmation => {
                "Confirmed units must exactly match the units assigned to the stop".to_string()
            }
            PodCheck::MissingUnitPhoto => {
                "At least one photo of the cargo is required".to_string()
            }
            PodCheck::MissingPaperworkPhoto => {
                "At least one photo of the paperwork is required".to_string()
            }
            PodCheck::TooFewPhotos { required } => {
                format!("At least {required} photos are required")
            }
            PodCheck::MissingSignature => "A receiver signature is required".to_string(),
            PodCheck::InvalidReceiverName { min_len } => {
                format!("Receiver name must be at least {min_len} characters")
            }
            PodCheck::MissingConditionNotes => {
                "Condition issues are flagged but the notes are empty".to_string()
            }
        }
    }
}

/// Rejection carrying every check that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Proof of delivery rejected: {}", .checks.iter().map(|c| c.code()).collect::<Vec<_>>().join(", "))]
pub struct PodValidationError {
    pub checks: Vec<PodCheck>,
}

impl PodValidationError {
    pub fn codes(&self) -> Vec<&'static str> {
        self.checks.iter().map(PodCheck::code).collect()
    }
}

/// Run every check against a package and the units due at the stop.
///
/// Checks accumulate; a package missing three things reports three
/// checks. The GPS fix is never required, capture degrades without it.
pub fn validate_pod(
    pod: &PodPackage,
    expected_units: &[&Unit],
    requirements: &PodRequirements,
) -> Result<(), PodValidationError> {
    let mut checks = Vec::new();

    let expected: BTreeSet<&str> = expected_units.iter().map(|u| u.id.as_str()).collect();
    let confirmed: BTreeSet<&str> = pod.confirmed_units.iter().map(String::as_str).collect();
    if expected != confirmed {
        checks.push(PodCheck::MissingUnitsConfirmation);
    }

    if !pod
        .photos
        .iter()
        .any(|p| p.category == PhotoCategory::Unit)
    {
        checks.push(PodCheck::MissingUnitPhoto);
    }
    if !pod
        .photos
        .iter()
        .any(|p| p.category == PhotoCategory::Paperwork)
    {
        checks.push(PodCheck::MissingPaperworkPhoto);
    }
    if pod.photos.len() < requirements.min_photos {
        checks.push(PodCheck::TooFewPhotos {
            required: requirements.min_photos,
        });
    }

    match &pod.signature {
        None => checks.push(PodCheck::MissingSignature),
        Some(signature) => {
            if signature.receiver_name.trim().chars().count() < requirements.min_receiver_name {
                checks.push(PodCheck::InvalidReceiverName {
                    min_len: requirements.min_receiver_name,
                });
            }
        }
    }

    if let Some(report) = &pod.condition_report {
        let notes_empty = report
            .notes
            .as_deref()
            .map(|n| n.trim().is_empty())
            .unwrap_or(true);
        if report.has_flags() && notes_empty {
            checks.push(PodCheck::MissingConditionNotes);
        }
    }

    if checks.is_empty() {
        Ok(())
    } else {
        Err(PodValidationError { checks })
    }
}

// ---------------------------------------------------------------------------
// Stop completion
// ---------------------------------------------------------------------------

/// Validate a package and complete the stop it documents.
///
/// Returns an updated copy of the trip; the input is never touched, so a
/// rejection leaves the caller's state exactly as it was. On success, in
/// one step:
///
/// - the stop becomes `Completed`, with `actual_arrival` backfilled when
///   the record has none and `actual_departure` stamped
/// - the package is attached to the stop as the evidence record
/// - at a delivery, the confirmed units become `Delivered` with the
///   receiver and timestamp recorded; at a pickup they come aboard as
///   `InTransit`
/// - the next pending stop (skipping any skipped ones) becomes
///   `InProgress` and `current_stop_index` follows it, or the trip
///   itself completes when none remains
/// - counters are recomputed and the history extended
pub fn complete_stop(
    trip: &Trip,
    stop_order: u32,
    pod: PodPackage,
    requirements: &PodRequirements,
    actor: Option<&str>,
    now: Timestamp,
) -> Result<Trip, CoreError> {
    if trip.status == TripStatus::Completed {
        return Err(CoreError::Conflict(format!(
            "Trip {} is already completed",
            trip.id
        )));
    }

    let stop_index = trip
        .stops
        .iter()
        .position(|s| s.order == stop_order)
        .ok_or_else(|| CoreError::NotFound {
            entity: "stop",
            id: format!("{}#{stop_order}", trip.id),
        })?;

    if trip.stops[stop_index].status != StopStatus::InProgress {
        return Err(CoreError::Conflict(format!(
            "Stop {stop_order} on trip {} is {:?}, only the in-progress stop can be completed",
            trip.id, trip.stops[stop_index].status
        )));
    }

    let expected = trip.units_for_stop(stop_order);
    validate_pod(&pod, &expected, requirements)?;

    let receiver = pod
        .signature
        .as_ref()
        .map(|s| s.receiver_name.trim().to_owned());

    let mut updated = trip.clone();

    let stop = &mut updated.stops[stop_index];
    stop.status = StopStatus::Completed;
    if stop.actual_arrival.is_none() {
        stop.actual_arrival = Some(now);
    }
    stop.actual_departure = Some(now);
    let stop_type = stop.stop_type;
    let stop_name = stop.location.name.clone();
    stop.pod = Some(pod);

    let mut units_touched = 0u32;
    match stop_type {
        StopType::Delivery => {
            for unit in updated
                .units
                .iter_mut()
                .filter(|u| u.destination_stop_order == stop_order)
            {
                unit.status = UnitStatus::Delivered;
                unit.delivered_at = Some(now);
                unit.signed_by = receiver.clone();
                units_touched += 1;
            }
        }
        StopType::Pickup => {
            let aboard: Vec<UnitId> = updated.stops[stop_index].unit_ids.clone();
            for unit in updated
                .units
                .iter_mut()
                .filter(|u| aboard.contains(&u.id) && u.status == UnitStatus::Loaded)
            {
                unit.status = UnitStatus::InTransit;
                units_touched += 1;
            }
        }
    }

    let next_pending = updated
        .stops
        .iter()
        .enumerate()
        .skip(stop_index + 1)
        .find(|(_, s)| s.status == StopStatus::Pending)
        .map(|(i, _)| i);

    let verb = match stop_type {
        StopType::Delivery => "delivered",
        StopType::Pickup => "picked up",
    };
    let signed = receiver
        .as_deref()
        .map(|name| format!("; signed by {name}"))
        .unwrap_or_default();
    let message =
        format!("Stop {stop_order} ({stop_name}) completed; {units_touched} units {verb}{signed}");
    updated.record_history(actor, message, now);

    match next_pending {
        Some(next) => {
            updated.stops[next].status = StopStatus::InProgress;
            updated.current_stop_index = next;
            let next_order = updated.stops[next].order;
            let next_name = updated.stops[next].location.name.clone();
            updated.record_history(
                actor,
                format!("Stop {next_order} ({next_name}) now in progress"),
                now,
            );
        }
        None => {
            updated.status = TripStatus::Completed;
            updated.current_stop_index = stop_index;
            updated.record_history(actor, "Trip completed; route finished", now);
        }
    }

    updated.recount();
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
