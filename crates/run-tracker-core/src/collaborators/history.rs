use crate::{CoreResult, geo::RunStats};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A finished run, handed to the history store on finalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// When the run was saved, milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
    /// Average speed in km/h.
    pub avg_speed_kmh: f64,
    /// Total distance in metres.
    pub distance_meters: f64,
    /// Total elapsed time in milliseconds.
    pub duration_millis: i64,
    /// Estimated calories burned.
    pub calories_burned: i64,
    /// Encoded preview image of the path, if the caller rendered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_image: Option<Vec<u8>>,
}

impl RunRecord {
    /// Builds a record from computed stats.
    pub fn from_stats(timestamp_millis: i64, duration_millis: i64, stats: RunStats) -> Self {
        Self {
            timestamp_millis,
            avg_speed_kmh: stats.avg_speed_kmh,
            distance_meters: stats.distance_meters,
            duration_millis,
            calories_burned: stats.calories_burned,
            path_image: None,
        }
    }
}

/// Durable, append-only list of completed runs.
#[async_trait]
pub trait RunHistoryStore: Send + Sync {
    /// Appends a finished run.
    async fn save(&self, record: RunRecord) -> CoreResult<()>;
}
