use crate::{
    geo::{Coordinate, Path},
    snapshot::Snapshot,
};

use tokio::sync::watch;
use tracing::trace;

/// Observable state of the current run.
///
/// Each field is a latest-value channel: writes are atomic per field,
/// subscribers always see a whole value and never hold up a writer. The
/// struct is shared as `Arc<SessionState>` between the controller, the
/// coordinator's tasks and any observers.
#[derive(Debug)]
pub struct SessionState {
    tracking: watch::Sender<bool>,
    path: watch::Sender<Path>,
    elapsed_millis: watch::Sender<i64>,
    gps_enabled: watch::Sender<bool>,
}

impl SessionState {
    /// Empty, paused session. GPS is assumed enabled until told otherwise.
    pub fn new() -> Self {
        Self {
            tracking: watch::Sender::new(false),
            path: watch::Sender::new(Path::new()),
            elapsed_millis: watch::Sender::new(0),
            gps_enabled: watch::Sender::new(true),
        }
    }

    /// Whether the run is actively recording.
    pub fn is_tracking(&self) -> bool {
        *self.tracking.borrow()
    }

    /// Copy of the recorded path.
    pub fn path(&self) -> Path {
        self.path.borrow().clone()
    }

    /// Runs `f` against the current path without cloning it.
    pub fn with_path<R>(&self, f: impl FnOnce(&Path) -> R) -> R {
        f(&self.path.borrow())
    }

    /// Elapsed run time in milliseconds.
    pub fn elapsed_millis(&self) -> i64 {
        *self.elapsed_millis.borrow()
    }

    /// Last known location-hardware state.
    pub fn gps_enabled(&self) -> bool {
        *self.gps_enabled.borrow()
    }

    /// Sets the tracking flag. Returns `true` if the value changed.
    pub fn set_tracking(&self, tracking: bool) -> bool {
        self.tracking.send_if_modified(|current| {
            if *current == tracking {
                return false;
            }
            *current = tracking;
            true
        })
    }

    /// Publishes a new elapsed time.
    pub fn set_elapsed_millis(&self, elapsed_millis: i64) {
        self.elapsed_millis.send_replace(elapsed_millis);
    }

    /// Publishes the location-hardware state.
    pub fn set_gps_enabled(&self, enabled: bool) {
        self.gps_enabled.send_if_modified(|current| {
            if *current == enabled {
                return false;
            }
            *current = enabled;
            true
        });
    }

    /// Appends `coordinate` to the last segment, opening one if the path is
    /// empty. Invalid coordinates are ignored; returns whether it was added.
    pub fn append_point(&self, coordinate: Coordinate) -> bool {
        if !coordinate.is_valid() {
            trace!(?coordinate, "Ignoring invalid coordinate");
            return false;
        }

        self.path.send_modify(|path| {
            if path.is_empty() {
                path.push(Vec::new());
            }
            if let Some(segment) = path.last_mut() {
                segment.push(coordinate);
            }
        });
        true
    }

    /// Starts a new segment so the next point is not joined to the previous
    /// one. Always appends, even after an empty segment.
    pub fn append_empty_segment(&self) {
        self.path.send_modify(|path| path.push(Vec::new()));
    }

    /// Replaces elapsed time and path with a restored snapshot. Tracking is
    /// left untouched.
    pub fn load(&self, snapshot: Snapshot) {
        self.elapsed_millis.send_replace(snapshot.elapsed_millis);
        self.path.send_replace(snapshot.path);
    }

    /// Projection of the persistable fields.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.elapsed_millis(), self.path())
    }

    /// Back to an empty, paused run. The GPS flag is kept.
    pub fn reset(&self) {
        self.set_tracking(false);
        self.path.send_replace(Path::new());
        self.elapsed_millis.send_replace(0);
    }

    /// Subscribes to the tracking flag.
    pub fn subscribe_tracking(&self) -> watch::Receiver<bool> {
        self.tracking.subscribe()
    }

    /// Subscribes to the recorded path.
    pub fn subscribe_path(&self) -> watch::Receiver<Path> {
        self.path.subscribe()
    }

    /// Subscribes to the elapsed time.
    pub fn subscribe_elapsed_millis(&self) -> watch::Receiver<i64> {
        self.elapsed_millis.subscribe()
    }

    /// Subscribes to the GPS flag.
    pub fn subscribe_gps_enabled(&self) -> watch::Receiver<bool> {
        self.gps_enabled.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
