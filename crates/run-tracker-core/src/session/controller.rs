//! Session lifecycle controller.
//!
//! The public state machine of a run:
//!
//! | State    | start_or_resume        | pause   | discard / finalize   |
//! |----------|------------------------|---------|----------------------|
//! | Idle     | Tracking (new segment) | no-op   | clear                |
//! | Tracking | no-op                  | Paused  | Idle, store cleared  |
//! | Paused   | Tracking (new segment) | no-op   | Idle, store cleared  |
//!
//! Commands are serialized by an internal async mutex, so the controller can
//! be shared as `Arc<SessionController>` between any number of callers.

use crate::{
    CoreResult,
    collaborators::{
        ForegroundHost, LocationSource, NotificationContent, RunHistoryStore, RunRecord,
    },
    geo::{CaloriePolicy, FlatRateCalories, RunStats},
    session::{CoordinatorConfig, SessionState, TrackingCoordinator},
    snapshot::SnapshotStore,
};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// External services a controller needs.
#[derive(Clone)]
pub struct Collaborators {
    /// Location fixes for the path.
    pub location: Arc<dyn LocationSource>,
    /// Foreground execution and notifications.
    pub host: Arc<dyn ForegroundHost>,
    /// Destination for finished runs.
    pub history: Arc<dyn RunHistoryStore>,
}

/// Owns the lifecycle of the current run.
pub struct SessionController {
    state: Arc<SessionState>,
    store: Arc<SnapshotStore>,
    host: Arc<dyn ForegroundHost>,
    history: Arc<dyn RunHistoryStore>,
    calories: Arc<dyn CaloriePolicy>,
    inner: Mutex<ControllerInner>,
}

struct ControllerInner {
    coordinator: TrackingCoordinator,
    in_foreground: bool,
}

impl SessionController {
    /// Creates a controller over `state`, persisting snapshots to `store`.
    pub fn new(
        state: Arc<SessionState>,
        store: Arc<SnapshotStore>,
        collaborators: Collaborators,
        config: CoordinatorConfig,
    ) -> Self {
        let coordinator = TrackingCoordinator::new(
            Arc::clone(&state),
            Arc::clone(&store),
            Arc::clone(&collaborators.host),
            collaborators.location,
            config,
        );

        Self {
            state,
            store,
            host: collaborators.host,
            history: collaborators.history,
            calories: Arc::new(FlatRateCalories::default()),
            inner: Mutex::new(ControllerInner {
                coordinator,
                in_foreground: false,
            }),
        }
    }

    /// Replaces the calorie estimate used for stats and saved runs.
    pub fn with_calorie_policy(mut self, policy: Arc<dyn CaloriePolicy>) -> Self {
        self.calories = policy;
        self
    }

    /// Shared session state for observers.
    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    /// Live statistics for the current run.
    pub fn stats(&self) -> RunStats {
        let elapsed = self.state.elapsed_millis();
        self.state
            .with_path(|path| RunStats::compute(path, elapsed, self.calories.as_ref()))
    }

    /// Restores an interrupted run, if any. Returns whether one was found.
    ///
    /// A restored run is loaded paused; the caller must resume it explicitly.
    #[instrument(skip(self))]
    pub async fn on_cold_start(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.coordinator.is_running() {
            warn!("Cold start requested while tracking; ignoring");
            return false;
        }

        let store = Arc::clone(&self.store);
        let restored = match tokio::task::spawn_blocking(move || store.restore()).await {
            Ok(restored) => restored,
            Err(e) => {
                error!(error = ?e, "Snapshot restore task failed");
                None
            }
        };

        self.state.set_tracking(false);

        match restored {
            Some(snapshot) => {
                let elapsed = snapshot.elapsed_millis;
                let segments = snapshot.path.len();
                self.state.load(snapshot);
                inner.coordinator.set_baseline(elapsed);

                info!(elapsed_ms = elapsed, segments, "Interrupted run restored");
                true
            }
            None => {
                self.state.reset();
                inner.coordinator.set_baseline(0);
                self.clear_store().await;

                debug!("No interrupted run");
                false
            }
        }
    }

    /// Starts a new run or resumes a paused one. No-op while tracking.
    #[instrument(skip(self))]
    pub async fn start_or_resume(&self) {
        let mut inner = self.inner.lock().await;

        if inner.coordinator.is_running() {
            debug!("Already tracking");
            return;
        }

        let elapsed = self.state.elapsed_millis();

        if !inner.in_foreground {
            self.host
                .enter_foreground(NotificationContent::for_run(elapsed, true));
            inner.in_foreground = true;
            info!("Entered foreground execution");
        }

        self.state.append_empty_segment();
        self.state.set_tracking(true);
        inner.coordinator.start();

        self.host
            .update_notification(NotificationContent::for_run(elapsed, true));

        info!(elapsed_ms = elapsed, "Tracking resumed");
    }

    /// Pauses tracking and freezes the elapsed time. No-op while paused.
    #[instrument(skip(self))]
    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;

        if !self.pause_locked(&mut inner).await {
            debug!("Already paused");
            return;
        }

        // Snapshot the frozen total; the tick loop will not write again.
        inner.coordinator.persist_now();

        if inner.in_foreground {
            self.host.update_notification(NotificationContent::for_run(
                self.state.elapsed_millis(),
                false,
            ));
        }
    }

    /// Drops the current run without saving it.
    #[instrument(skip(self))]
    pub async fn discard(&self) {
        let mut inner = self.inner.lock().await;

        self.pause_locked(&mut inner).await;
        self.cleanup_locked(&mut inner).await;

        info!("Run discarded");
    }

    /// Saves the current run to history and resets the session.
    ///
    /// Returns `Ok(None)` without touching history when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns the history store's error. The run is then left paused and
    /// its snapshot kept, so saving can be retried.
    #[instrument(skip(self))]
    pub async fn finalize(&self) -> CoreResult<Option<RunRecord>> {
        let mut inner = self.inner.lock().await;

        self.pause_locked(&mut inner).await;

        let elapsed = self.state.elapsed_millis();
        let has_points = self
            .state
            .with_path(|path| path.iter().any(|segment| !segment.is_empty()));

        if elapsed == 0 && !has_points {
            debug!("Nothing recorded; finalize only clears");
            self.cleanup_locked(&mut inner).await;
            return Ok(None);
        }

        let stats = self.stats();
        let record = RunRecord::from_stats(Utc::now().timestamp_millis(), elapsed, stats);

        if let Err(e) = self.history.save(record.clone()).await {
            error!(error = ?e, "Failed to save run; keeping session for retry");
            inner.coordinator.persist_now();
            return Err(e);
        }

        info!(
            distance_m = record.distance_meters,
            duration_ms = record.duration_millis,
            calories = record.calories_burned,
            "Run saved"
        );

        self.cleanup_locked(&mut inner).await;

        Ok(Some(record))
    }

    /// Returns whether a running coordinator was stopped.
    async fn pause_locked(&self, inner: &mut ControllerInner) -> bool {
        self.state.set_tracking(false);

        if !inner.coordinator.is_running() {
            return false;
        }

        inner.coordinator.stop().await;

        info!(elapsed_ms = self.state.elapsed_millis(), "Tracking paused");
        true
    }

    async fn cleanup_locked(&self, inner: &mut ControllerInner) {
        self.state.reset();
        inner.coordinator.set_baseline(0);
        self.clear_store().await;

        if inner.in_foreground {
            self.host.exit();
            inner.in_foreground = false;
            info!("Left foreground execution");
        }
    }

    async fn clear_store(&self) {
        let store = Arc::clone(&self.store);
        if let Err(e) = tokio::task::spawn_blocking(move || store.clear()).await {
            error!(error = ?e, "Snapshot clear task failed");
        }
    }
}
