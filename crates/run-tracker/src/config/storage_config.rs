use crate::config::{default_history_path, default_snapshot_path};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where run data lives on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Crash-recovery snapshot of the current run.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// JSON-lines file of finished runs.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            history_path: default_history_path(),
        }
    }
}
