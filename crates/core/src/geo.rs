//! Coordinate primitives shared by the domain model and the simulator.
//!
//! Positions are plain latitude/longitude pairs in decimal degrees.
//! Distances are straight-line approximations in degree space; the
//! engine never does road-network routing.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// False when either coordinate is NaN or infinite, which happens
    /// only with corrupt source data.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Straight-line (Euclidean) distance to `other`, in degrees.
    pub fn distance_deg(&self, other: &GeoPoint) -> f64 {
        let d_lat = other.latitude - self.latitude;
        let d_lng = other.longitude - self.longitude;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }

    /// Linear interpolation toward `target`, applied independently on
    /// latitude and longitude: `a + (b - a) * t`.
    pub fn lerp_toward(&self, target: &GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude + (target.latitude - self.latitude) * t,
            longitude: self.longitude + (target.longitude - self.longitude) * t,
        }
    }
}

/// A device-reported position with its error radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub position: GeoPoint,
    /// Reported accuracy radius in meters.
    pub accuracy_m: f64,
    pub captured_at: crate::types::Timestamp,
}
