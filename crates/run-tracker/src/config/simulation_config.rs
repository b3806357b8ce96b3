use crate::config::{
    default_fix_interval_ms, default_gps_enabled, default_start_latitude,
    default_start_longitude, default_step_meters,
};

use run_tracker_core::Coordinate;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated location and GPS status for the console host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Latitude of the first fix.
    #[serde(default = "default_start_latitude")]
    pub start_latitude: f64,
    /// Longitude of the first fix.
    #[serde(default = "default_start_longitude")]
    pub start_longitude: f64,
    /// Time between fixes, in milliseconds.
    #[serde(default = "default_fix_interval_ms")]
    pub fix_interval_ms: u64,
    /// Distance walked between fixes, in metres.
    #[serde(default = "default_step_meters")]
    pub step_meters: f64,
    /// Reported GPS status.
    #[serde(default = "default_gps_enabled")]
    pub gps_enabled: bool,
}

impl SimulationConfig {
    pub(crate) fn start(&self) -> Coordinate {
        Coordinate::new(self.start_latitude, self.start_longitude)
    }

    pub(crate) fn fix_interval(&self) -> Duration {
        Duration::from_millis(self.fix_interval_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_latitude: default_start_latitude(),
            start_longitude: default_start_longitude(),
            fix_interval_ms: default_fix_interval_ms(),
            step_meters: default_step_meters(),
            gps_enabled: default_gps_enabled(),
        }
    }
}
