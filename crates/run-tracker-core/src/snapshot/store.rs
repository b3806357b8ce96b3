//! Crash-recovery snapshot of the in-progress run.
//!
//! A single JSON file holds `{elapsed, path}`. Writes go to a sibling temp
//! file which is synced and renamed over the target, so a restore never sees
//! a half-written snapshot.

use crate::{CoreResult, TrackerError, geo::Path};

use std::{
    ffi::OsString,
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::PathBuf,
    sync::Mutex,
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// File name used when the snapshot lives in a data directory.
pub const SNAPSHOT_FILE_NAME: &str = "temp_run_state.json";

/// Persisted projection of the session: elapsed time and path only.
///
/// Tracking and GPS flags are not stored; a restored run always starts
/// paused.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elapsed run time in milliseconds.
    #[serde(rename = "time_in_millis")]
    pub elapsed_millis: i64,
    /// Recorded path segments.
    #[serde(rename = "path_points")]
    pub path: Path,
}

impl Snapshot {
    /// Creates a snapshot from its parts.
    pub fn new(elapsed_millis: i64, path: Path) -> Self {
        Self {
            elapsed_millis,
            path,
        }
    }

    /// Whether the elapsed time is non-negative and every point is a real
    /// coordinate.
    pub fn is_valid(&self) -> bool {
        self.elapsed_millis >= 0 && self.path.iter().flatten().all(|c| c.is_valid())
    }
}

/// File-backed store for a single [`Snapshot`].
///
/// Writes and clears are serialized by an internal lock. Every `clear()`
/// starts a new generation; writes tagged with an older generation are
/// dropped so a snapshot scheduled before a discard cannot bring the run
/// back.
#[derive(Debug)]
pub struct SnapshotStore {
    file_path: PathBuf,
    generation: Mutex<u64>,
}

impl SnapshotStore {
    /// Creates a store backed by `file_path`. Nothing is touched on disk yet.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            generation: Mutex::new(0),
        }
    }

    /// Location of the backing file.
    pub fn file_path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// Current write generation.
    pub fn generation(&self) -> u64 {
        *self.lock_generation()
    }

    /// Atomically replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be encoded or written.
    #[track_caller]
    #[instrument(skip(self, snapshot), fields(elapsed_ms = snapshot.elapsed_millis))]
    pub fn persist(&self, snapshot: &Snapshot) -> CoreResult<()> {
        let _guard = self.lock_generation();
        self.write_atomic(snapshot)
    }

    /// Writes `snapshot` only if no `clear()` happened since `generation`
    /// was read. Returns whether the write took place.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be encoded or written.
    #[track_caller]
    #[instrument(skip(self, snapshot), fields(elapsed_ms = snapshot.elapsed_millis))]
    pub fn persist_if_current(&self, generation: u64, snapshot: &Snapshot) -> CoreResult<bool> {
        let guard = self.lock_generation();

        if *guard != generation {
            debug!(
                stale = generation,
                current = *guard,
                "Dropping snapshot from a cleared run"
            );
            return Ok(false);
        }

        self.write_atomic(snapshot)?;
        Ok(true)
    }

    /// Loads the last snapshot. Missing, unreadable, corrupt or out-of-range
    /// files all yield `None`.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Option<Snapshot> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.file_path, "No snapshot present");
                return None;
            }
            Err(e) => {
                warn!(path = ?self.file_path, error = %e, "Failed to read snapshot");
                return None;
            }
        };

        match serde_json::from_str::<Snapshot>(&contents) {
            Ok(snapshot) if !snapshot.is_valid() => {
                warn!(
                    path = ?self.file_path,
                    elapsed_ms = snapshot.elapsed_millis,
                    "Ignoring snapshot with out-of-range values"
                );
                None
            }
            Ok(snapshot) => {
                info!(
                    elapsed_ms = snapshot.elapsed_millis,
                    segments = snapshot.path.len(),
                    "Snapshot restored"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(path = ?self.file_path, error = %e, "Ignoring corrupt snapshot");
                None
            }
        }
    }

    /// Deletes the snapshot and invalidates pending writes. Idempotent.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        let mut generation = self.lock_generation();
        *generation += 1;

        match fs::remove_file(&self.file_path) {
            Ok(()) => info!(path = ?self.file_path, "Snapshot cleared"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?self.file_path, error = %e, "Failed to delete snapshot"),
        }
    }

    #[track_caller]
    fn write_atomic(&self, snapshot: &Snapshot) -> CoreResult<()> {
        let contents =
            serde_json::to_vec(snapshot).map_err(|e| TrackerError::SnapshotEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            debug!(dir = ?parent, "Created snapshot directory");
        }

        let temp_path = self.temp_path();

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| self.io_error(e))?;
        temp_file
            .write_all(&contents)
            .map_err(|e| self.io_error(e))?;
        temp_file.sync_all().map_err(|e| self.io_error(e))?;

        fs::rename(&temp_path, &self.file_path).map_err(|e| self.io_error(e))?;

        debug!(
            path = ?self.file_path,
            elapsed_ms = snapshot.elapsed_millis,
            "Snapshot written (atomic)"
        );

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.file_path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    #[track_caller]
    fn io_error(&self, source: std::io::Error) -> TrackerError {
        TrackerError::SnapshotIo {
            path: self.file_path.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    fn lock_generation(&self) -> std::sync::MutexGuard<'_, u64> {
        // A panic while holding the lock leaves the counter intact.
        self.generation.lock().unwrap_or_else(|e| e.into_inner())
    }
}
