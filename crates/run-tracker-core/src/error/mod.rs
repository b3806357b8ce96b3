use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Run tracking errors with source location tracking.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Reading or writing the temporary snapshot file failed.
    #[error("Snapshot I/O failed at {path:?}: {source} {location}")]
    SnapshotIo {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Snapshot could not be serialized.
    #[error("Snapshot encoding failed: {source} {location}")]
    SnapshotEncode {
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The run history store rejected a finished run.
    #[error("Run history store failed: {reason} {location}")]
    HistoryStore {
        /// Description of the store failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl TrackerError {
    /// Builds a [`TrackerError::HistoryStore`] tagged with the caller's location.
    #[track_caller]
    pub fn history_store(reason: impl Into<String>) -> Self {
        TrackerError::HistoryStore {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`TrackerError`].
pub type Result<T> = std::result::Result<T, TrackerError>;
