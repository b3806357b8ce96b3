//! Run Tracker Core Library
//!
//! Session engine for recording runs: a restartable state machine that
//! combines a stopwatch, a location stream and crash-safe snapshots, plus
//! the distance, speed and calorie math derived from the recorded path.
//!
//! # Example
//!
//! ```no_run
//! use run_tracker_core::{
//!     Collaborators, CoordinatorConfig, CoreResult, SessionController, SessionState,
//!     SnapshotStore,
//! };
//!
//! use std::{sync::Arc, time::Duration};
//!
//! async fn record(collaborators: Collaborators) -> CoreResult<()> {
//!     let state = Arc::new(SessionState::new());
//!     let store = Arc::new(SnapshotStore::new("temp_run_state.json"));
//!     let controller =
//!         SessionController::new(state, store, collaborators, CoordinatorConfig::default());
//!
//!     controller.on_cold_start().await;
//!     controller.start_or_resume().await;
//!     tokio::time::sleep(Duration::from_secs(30)).await;
//!     controller.pause().await;
//!
//!     if let Some(record) = controller.finalize().await? {
//!         println!("Ran {:.0} m", record.distance_meters);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collaborators;
mod error;
pub mod geo;
mod session;
mod snapshot;

pub use {
    collaborators::{
        ForegroundHost, GpsStatusSource, LocationFix, LocationSource, NotificationAction,
        NotificationContent, RunHistoryStore, RunRecord,
    },
    error::{Result as CoreResult, TrackerError},
    geo::{Coordinate, Path, RunStats, Segment},
    session::{
        Collaborators, CoordinatorConfig, DEFAULT_PERSIST_INTERVAL, DEFAULT_TICK_INTERVAL,
        GpsMonitor, SessionController, SessionState, TrackingCoordinator,
    },
    snapshot::{SNAPSHOT_FILE_NAME, Snapshot, SnapshotStore},
};

#[cfg(test)]
mod tests;
