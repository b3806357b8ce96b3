use crate::config::{
    default_calories_per_km, default_persist_interval_secs, default_tick_interval_ms,
};

use run_tracker_core::{CoordinatorConfig, geo::FlatRateCalories};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session timing and calorie settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// How often elapsed time is republished, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Run time between crash-recovery snapshots, in seconds.
    #[serde(default = "default_persist_interval_secs")]
    pub persist_interval_secs: u64,
    /// Calories credited per kilometre.
    #[serde(default = "default_calories_per_km")]
    pub calories_per_km: f64,
}

impl TrackingConfig {
    pub(crate) fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            persist_interval: Duration::from_secs(self.persist_interval_secs),
        }
    }

    pub(crate) fn calorie_policy(&self) -> FlatRateCalories {
        FlatRateCalories::new(self.calories_per_km)
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            persist_interval_secs: default_persist_interval_secs(),
            calories_per_km: default_calories_per_km(),
        }
    }
}
