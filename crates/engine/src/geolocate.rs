//! Device location capture behind an injectable provider.
//!
//! Proof-of-delivery capture wants to know where the driver stood, but
//! must never block on a device that cannot answer. [`capture_fix`]
//! wraps any [`GeolocationProvider`] in a timeout and degrades to
//! `None`; the package simply goes through without a fix.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use loadwatch_core::geo::{GeoFix, GeoPoint};

/// How long to wait for a device fix before giving up.
pub const GPS_CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a location request produced nothing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeolocationError {
    /// The device denied the request or has no signal.
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// A source of device position fixes.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoFix, GeolocationError>;
}

/// Ask the provider for a fix, giving up after `timeout`.
///
/// Failures and timeouts are logged at warn level and collapse to
/// `None`; callers attach the fix when present and move on when not.
pub async fn capture_fix(
    provider: &dyn GeolocationProvider,
    timeout: Duration,
) -> Option<GeoFix> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(fix)) => Some(fix),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Location capture failed; continuing without a fix");
            None
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Location capture timed out; continuing without a fix"
            );
            None
        }
    }
}

/// Provider that reports a jittered fix near a known point.
///
/// Stands in for a real device in the monitor and in tests: the fix
/// lands within ~50 m of `base` with a plausible accuracy radius.
pub struct SimulatedGeolocation {
    base: GeoPoint,
}

impl SimulatedGeolocation {
    pub fn at(base: GeoPoint) -> Self {
        Self { base }
    }
}

#[async_trait]
impl GeolocationProvider for SimulatedGeolocation {
    async fn current_position(&self) -> Result<GeoFix, GeolocationError> {
        let mut rng = rand::rng();
        let position = GeoPoint::new(
            self.base.latitude + rng.random_range(-0.0005..=0.0005),
            self.base.longitude + rng.random_range(-0.0005..=0.0005),
        );
        Ok(GeoFix {
            position,
            accuracy_m: rng.random_range(5.0..=25.0),
            captured_at: Utc::now(),
        })
    }
}
