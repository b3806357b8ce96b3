mod simulation_config;
mod storage_config;
#[allow(clippy::module_inception)]
mod config;
mod tracking_config;

pub(crate) use {
    config::Config, simulation_config::SimulationConfig, storage_config::StorageConfig,
    tracking_config::TrackingConfig,
};

use run_tracker_core::{SNAPSHOT_FILE_NAME, geo::DEFAULT_CALORIES_PER_KM};

use std::path::PathBuf;

use directories::ProjectDirs;

pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub(crate) const DEFAULT_PERSIST_INTERVAL_SECS: u64 = 5;
pub(crate) const DEFAULT_START_LATITUDE: f64 = 37.5665;
pub(crate) const DEFAULT_START_LONGITUDE: f64 = 126.9780;
pub(crate) const DEFAULT_FIX_INTERVAL_MS: u64 = 1000;
pub(crate) const DEFAULT_STEP_METERS: f64 = 3.0;
pub(crate) const DEFAULT_GPS_ENABLED: bool = true;
pub(crate) const HISTORY_FILE_NAME: &str = "run_history.jsonl";

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "run-tracker", "Run-Tracker")
}

/// Falls back to the working directory when no home directory is known.
fn data_file(name: &str) -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_persist_interval_secs() -> u64 {
    DEFAULT_PERSIST_INTERVAL_SECS
}

pub(crate) fn default_calories_per_km() -> f64 {
    DEFAULT_CALORIES_PER_KM
}

pub(crate) fn default_snapshot_path() -> PathBuf {
    data_file(SNAPSHOT_FILE_NAME)
}

pub(crate) fn default_history_path() -> PathBuf {
    data_file(HISTORY_FILE_NAME)
}

pub(crate) fn default_start_latitude() -> f64 {
    DEFAULT_START_LATITUDE
}

pub(crate) fn default_start_longitude() -> f64 {
    DEFAULT_START_LONGITUDE
}

pub(crate) fn default_fix_interval_ms() -> u64 {
    DEFAULT_FIX_INTERVAL_MS
}

pub(crate) fn default_step_meters() -> f64 {
    DEFAULT_STEP_METERS
}

pub(crate) fn default_gps_enabled() -> bool {
    DEFAULT_GPS_ENABLED
}
