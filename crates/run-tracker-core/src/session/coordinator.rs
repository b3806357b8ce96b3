//! Timer and location coordinator.
//!
//! While running, two tasks drive the session forward: a tick loop that
//! republishes the elapsed time every few tens of milliseconds, and a
//! location task that appends fixes to the path. Stopping folds the lap into
//! the accumulated total so the next start continues from the same baseline.

use crate::{
    collaborators::{ForegroundHost, LocationFix, LocationSource, NotificationContent},
    session::SessionState,
    snapshot::SnapshotStore,
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::{StreamExt, stream::BoxStream};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, instrument, trace, warn};

/// Default tick period. Short enough for a smooth stopwatch display.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Default run time between crash-recovery snapshots.
pub const DEFAULT_PERSIST_INTERVAL: Duration = Duration::from_secs(5);

/// Timing knobs for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// How often the tick loop republishes elapsed time. Minimum 1 ms.
    pub tick_interval: Duration,
    /// Run time between snapshots. Rounded to whole seconds, minimum one.
    pub persist_interval: Duration,
}

/// Shortest tick period the loop will run with.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

impl CoordinatorConfig {
    fn tick_period(&self) -> Duration {
        self.tick_interval.max(MIN_TICK_INTERVAL)
    }

    fn persist_every_secs(&self) -> i64 {
        i64::try_from(self.persist_interval.as_secs())
            .unwrap_or(i64::MAX)
            .max(1)
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            persist_interval: DEFAULT_PERSIST_INTERVAL,
        }
    }
}

/// Drives [`SessionState`] while a run is being tracked.
pub struct TrackingCoordinator {
    state: Arc<SessionState>,
    store: Arc<SnapshotStore>,
    host: Arc<dyn ForegroundHost>,
    location: Arc<dyn LocationSource>,
    config: CoordinatorConfig,
    accumulated_millis: i64,
    run: Option<ActiveRun>,
}

struct ActiveRun {
    started_at: Instant,
    /// Cleared before the tasks are torn down; the location task checks it
    /// before every append.
    active: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    tick_task: JoinHandle<()>,
    location_task: JoinHandle<()>,
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.tick_task.abort();
        self.location_task.abort();
    }
}

impl TrackingCoordinator {
    /// Creates an idle coordinator with a zero baseline.
    pub fn new(
        state: Arc<SessionState>,
        store: Arc<SnapshotStore>,
        host: Arc<dyn ForegroundHost>,
        location: Arc<dyn LocationSource>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            state,
            store,
            host,
            location,
            config,
            accumulated_millis: 0,
            run: None,
        }
    }

    /// Whether the tick loop and location subscription are active.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Run time folded in from previous laps.
    pub fn accumulated_millis(&self) -> i64 {
        self.accumulated_millis
    }

    /// Replaces the accumulated total, e.g. after a restore or a discard.
    /// Ignored while running.
    pub fn set_baseline(&mut self, accumulated_millis: i64) {
        if self.is_running() {
            warn!("Ignoring baseline change while running");
            return;
        }
        self.accumulated_millis = accumulated_millis.max(0);
    }

    /// Starts the tick loop and subscribes to locations. No-op if running.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self), fields(baseline_ms = self.accumulated_millis))]
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Coordinator already running");
            return;
        }

        let started_at = Instant::now();
        let active = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let ticker = TickLoop {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            host: Arc::clone(&self.host),
            config: self.config,
            accumulated_millis: self.accumulated_millis,
            started_at,
        };
        let tick_task = tokio::spawn(ticker.run(shutdown_rx));

        let location_task = tokio::spawn(follow_locations(
            self.location.stream(),
            Arc::clone(&self.state),
            Arc::clone(&active),
        ));

        self.run = Some(ActiveRun {
            started_at,
            active,
            shutdown_tx,
            tick_task,
            location_task,
        });

        info!("Coordinator started");
    }

    /// Stops both tasks and folds the lap into the accumulated total.
    ///
    /// When this returns no further fix will be appended and the published
    /// elapsed time equals the new total. No-op if idle.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        let Some(mut run) = self.run.take() else {
            debug!("Coordinator already idle");
            return;
        };

        run.active.store(false, Ordering::Release);
        run.location_task.abort();
        let _ = run.shutdown_tx.send(true);

        if let Err(e) = (&mut run.tick_task).await {
            error!(error = ?e, "Tick loop task failed");
        }
        match (&mut run.location_task).await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => error!(error = ?e, "Location task failed"),
        }

        // Measured after the tick loop has exited so the folded total is
        // never below a value it already published.
        let lap_millis = millis_since(run.started_at);
        self.accumulated_millis = self.accumulated_millis.saturating_add(lap_millis);
        self.state.set_elapsed_millis(self.accumulated_millis);

        info!(
            lap_ms = lap_millis,
            total_ms = self.accumulated_millis,
            "Coordinator stopped"
        );
    }

    /// Schedules an immediate snapshot of the current session.
    pub fn persist_now(&self) {
        schedule_persist(&self.store, &self.state);
    }
}

struct TickLoop {
    state: Arc<SessionState>,
    store: Arc<SnapshotStore>,
    host: Arc<dyn ForegroundHost>,
    config: CoordinatorConfig,
    accumulated_millis: i64,
    started_at: Instant,
}

impl TickLoop {
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.tick_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let persist_every = self.config.persist_every_secs();
        let mut last_whole_second = self.accumulated_millis / 1000;

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => break,

                _ = ticker.tick() => {
                    let elapsed = self
                        .accumulated_millis
                        .saturating_add(millis_since(self.started_at));
                    self.state.set_elapsed_millis(elapsed);

                    let whole_second = elapsed / 1000;
                    if whole_second > last_whole_second {
                        self.host
                            .update_notification(NotificationContent::for_run(elapsed, true));

                        if whole_second / persist_every > last_whole_second / persist_every {
                            schedule_persist(&self.store, &self.state);
                        }

                        last_whole_second = whole_second;
                    }
                }
            }
        }

        trace!("Tick loop exited");
    }
}

async fn follow_locations(
    mut fixes: BoxStream<'static, LocationFix>,
    state: Arc<SessionState>,
    active: Arc<AtomicBool>,
) {
    while let Some(fix) = fixes.next().await {
        if !active.load(Ordering::Acquire) {
            break;
        }

        if state.append_point(fix.coordinate()) {
            trace!(lat = fix.latitude, lng = fix.longitude, "Location appended");
        }
    }

    if active.load(Ordering::Acquire) {
        warn!("Location stream ended while tracking; path will not grow until resumed");
    }
}

/// Fire-and-forget snapshot write on the blocking pool.
fn schedule_persist(store: &Arc<SnapshotStore>, state: &SessionState) {
    let generation = store.generation();
    let snapshot = state.snapshot();
    let store = Arc::clone(store);

    tokio::task::spawn_blocking(move || {
        match store.persist_if_current(generation, &snapshot) {
            Ok(true) => debug!(elapsed_ms = snapshot.elapsed_millis, "Snapshot persisted"),
            Ok(false) => {}
            Err(e) => warn!(error = ?e, "Failed to persist snapshot; continuing"),
        }
    });
}

fn millis_since(started_at: Instant) -> i64 {
    i64::try_from(started_at.elapsed().as_millis()).unwrap_or(i64::MAX)
}
