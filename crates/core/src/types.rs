/// Trips are keyed by an operator-visible id (e.g. `"TRP-2041"`).
pub type TripId = String;

/// Cargo units are keyed by an operator-visible id (e.g. a VIN fragment).
pub type UnitId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
