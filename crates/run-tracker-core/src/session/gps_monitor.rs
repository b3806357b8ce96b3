use crate::{collaborators::GpsStatusSource, session::SessionState};

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Mirrors the GPS-enabled signal into [`SessionState`].
///
/// Display-only: the engine never changes behaviour based on the flag. The
/// background task stops when the monitor is dropped.
pub struct GpsMonitor {
    task: JoinHandle<()>,
}

impl GpsMonitor {
    /// Subscribes to `source` and forwards every value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(source: &dyn GpsStatusSource, state: Arc<SessionState>) -> Self {
        let mut updates = source.stream();

        let task = tokio::spawn(async move {
            while let Some(enabled) = updates.next().await {
                info!(gps_enabled = enabled, "GPS status received");
                state.set_gps_enabled(enabled);
            }
            debug!("GPS status stream ended");
        });

        Self { task }
    }

    /// Whether the forwarding task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for GpsMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
