use std::time::Duration;

/// Monitor configuration loaded from environment variables.
///
/// All fields have defaults suitable for running the demo locally.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Seconds between simulation ticks (default: `2`).
    pub tick_interval_secs: u64,
    /// Seconds to wait for a GPS fix before capturing without one
    /// (default: `10`).
    pub gps_timeout_secs: u64,
    /// Seconds between autopilot sweeps over the fleet (default: `3`).
    pub autopilot_interval_secs: u64,
    /// Seconds between fleet board snapshots in the log (default: `30`).
    pub summary_interval_secs: u64,
    /// Whether the autopilot completes stops on arrival (default:
    /// `true`). When off, vehicles drive to their first stop and hold.
    pub auto_deliver: bool,
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `TICK_INTERVAL_SECS`      | `2`     |
    /// | `GPS_TIMEOUT_SECS`        | `10`    |
    /// | `AUTOPILOT_INTERVAL_SECS` | `3`     |
    /// | `SUMMARY_INTERVAL_SECS`   | `30`    |
    /// | `AUTO_DELIVER`            | `true`  |
    pub fn from_env() -> Self {
        let tick_interval_secs: u64 = std::env::var("TICK_INTERVAL_SECS")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("TICK_INTERVAL_SECS must be a valid u64");

        let gps_timeout_secs: u64 = std::env::var("GPS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("GPS_TIMEOUT_SECS must be a valid u64");

        let autopilot_interval_secs: u64 = std::env::var("AUTOPILOT_INTERVAL_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("AUTOPILOT_INTERVAL_SECS must be a valid u64");

        let summary_interval_secs: u64 = std::env::var("SUMMARY_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SUMMARY_INTERVAL_SECS must be a valid u64");

        let auto_deliver: bool = std::env::var("AUTO_DELIVER")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("AUTO_DELIVER must be true or false");

        Self {
            tick_interval_secs,
            gps_timeout_secs,
            autopilot_interval_secs,
            summary_interval_secs,
            auto_deliver,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn gps_timeout(&self) -> Duration {
        Duration::from_secs(self.gps_timeout_secs)
    }

    pub fn autopilot_interval(&self) -> Duration {
        Duration::from_secs(self.autopilot_interval_secs)
    }

    pub fn summary_interval(&self) -> Duration {
        Duration::from_secs(self.summary_interval_secs)
    }
}
