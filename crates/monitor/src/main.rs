//! `loadwatch-monitor` -- fleet lifecycle demo daemon.
//!
//! Seeds a demo fleet, dispatches it, and lets the engine run: the
//! simulator moves vehicles every tick, the autopilot completes stops
//! with generated proof-of-delivery packages on arrival, and every
//! domain event lands in the log. Stop it with Ctrl-C or SIGTERM.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default | Description                           |
//! |---------------------------|----------|---------|---------------------------------------|
//! | `TICK_INTERVAL_SECS`      | no       | `2`     | Seconds between simulation ticks      |
//! | `GPS_TIMEOUT_SECS`        | no       | `10`    | Wait for a GPS fix before going without |
//! | `AUTOPILOT_INTERVAL_SECS` | no       | `3`     | Seconds between autopilot sweeps      |
//! | `SUMMARY_INTERVAL_SECS`   | no       | `30`    | Seconds between fleet board snapshots |
//! | `AUTO_DELIVER`            | no       | `true`  | Complete stops automatically on arrival |

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loadwatch_core::pod::PodRequirements;
use loadwatch_engine::{simulator, FleetStore};
use loadwatch_events::EventBus;
use loadwatch_monitor::config::MonitorConfig;
use loadwatch_monitor::{autopilot, eventlog, fixtures, summary};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "loadwatch_monitor=debug,loadwatch_engine=debug,loadwatch_core=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = MonitorConfig::from_env();
    tracing::info!(
        tick_interval_secs = config.tick_interval_secs,
        gps_timeout_secs = config.gps_timeout_secs,
        auto_deliver = config.auto_deliver,
        "Loaded monitor configuration"
    );

    // --- Store and fleet ---
    let event_bus = Arc::new(EventBus::default());
    let store = Arc::new(FleetStore::new(
        Arc::clone(&event_bus),
        PodRequirements::default(),
    ));

    let fleet = fixtures::demo_fleet();
    let trip_ids: Vec<String> = fleet.iter().map(|t| t.id.clone()).collect();
    let loaded = store.load_fleet(fleet).await;
    tracing::info!(loaded, "Demo fleet seeded");

    // --- Background tasks ---
    let cancel = tokio_util::sync::CancellationToken::new();

    let eventlog_handle = tokio::spawn(eventlog::run(event_bus.subscribe(), cancel.clone()));

    let simulator_handle = tokio::spawn(simulator::run(
        Arc::clone(&store),
        config.tick_interval(),
        cancel.clone(),
    ));

    let autopilot_handle = tokio::spawn(autopilot::run(
        Arc::clone(&store),
        config.autopilot_interval(),
        config.gps_timeout(),
        config.auto_deliver,
        cancel.clone(),
    ));

    let summary_handle = tokio::spawn(summary::run(
        Arc::clone(&store),
        config.summary_interval(),
        cancel.clone(),
    ));

    // --- Dispatch the fleet ---
    for trip_id in &trip_ids {
        match store.dispatch_trip(trip_id, Some("dispatch-desk")).await {
            Ok(trip) => {
                tracing::info!(trip_id = %trip.id, driver = %trip.driver_name, "On the road");
            }
            Err(e) => {
                tracing::warn!(trip_id = %trip_id, error = %e, "Dispatch failed");
            }
        }
    }

    // --- Run until a termination signal ---
    shutdown_signal().await;

    // --- Post-shutdown cleanup ---
    tracing::info!("Stopping background tasks");
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), simulator_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), autopilot_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), summary_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), eventlog_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the daemon
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
