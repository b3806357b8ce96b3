use crate::{
    NotificationAction, NotificationContent, Snapshot,
    geo::Coordinate,
    tests::fakes::{Fixture, HostCall, north_of, settle, wait_for_snapshot},
};

use std::time::Duration;

use tempfile::tempdir;

const ORIGIN: Coordinate = Coordinate::new(37.5665, 126.9780);

/// WHAT: Each resume opens a new segment and fixes go to the current one
/// WHY: Distance must not bridge the gap across a pause
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_pause_between_fixes_when_resuming_then_path_split_into_segments() {
    // Given: Two fixes in the first lap
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    let points: Vec<Coordinate> = (0..4).map(|i| north_of(ORIGIN, 10.0 * f64::from(i))).collect();

    fx.controller.start_or_resume().await;
    fx.location.emit(points[0]);
    fx.location.emit(points[1]);
    settle().await;
    fx.controller.pause().await;

    // When: Resuming and recording two more
    fx.controller.start_or_resume().await;
    fx.location.emit(points[2]);
    fx.location.emit(points[3]);
    settle().await;
    fx.controller.pause().await;

    // Then: Two segments of two points
    assert_eq!(
        fx.state.path(),
        vec![vec![points[0], points[1]], vec![points[2], points[3]]]
    );
}

/// WHAT: Cold start restores an interrupted run paused, and resume continues its time
/// WHY: A crashed process must not lose the run or silently restart it
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_snapshot_on_disk_when_cold_starting_then_run_restored_paused() {
    // Given: A snapshot left behind by a previous process
    let dir = tempdir().unwrap();
    let path = vec![vec![ORIGIN, north_of(ORIGIN, 50.0)]];
    {
        let previous = Fixture::new(dir.path());
        previous
            .store
            .persist(&Snapshot::new(1234, path.clone()))
            .unwrap();
    }
    let fx = Fixture::new(dir.path());

    // When: Cold starting
    let restored = fx.controller.on_cold_start().await;

    // Then: Loaded but not tracking
    assert!(restored);
    assert_eq!(fx.state.elapsed_millis(), 1234);
    assert_eq!(fx.state.path(), path);
    assert!(!fx.state.is_tracking());
    assert!(fx.host.calls().is_empty());

    // And resuming continues from the restored time
    fx.controller.start_or_resume().await;
    assert_eq!(fx.state.elapsed_millis(), 1234);
    tokio::time::sleep(Duration::from_secs(1)).await;
    fx.controller.pause().await;
    assert_eq!(fx.state.elapsed_millis(), 2234);
    assert_eq!(fx.state.path().len(), 2);
}

/// WHAT: Cold start without a snapshot leaves an empty idle session
/// WHY: A fresh install has nothing to restore
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_no_snapshot_when_cold_starting_then_idle() {
    // Given: An empty data directory
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());

    // When: Cold starting
    let restored = fx.controller.on_cold_start().await;

    // Then: Empty session
    assert!(!restored);
    assert_eq!(fx.state.elapsed_millis(), 0);
    assert!(fx.state.path().is_empty());
    assert!(!fx.state.is_tracking());
}

/// WHAT: Pause while paused changes nothing
/// WHY: Notification buttons and UI can both send the same command
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_paused_session_when_pausing_again_then_no_change() {
    // Given: A paused run
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    fx.controller.pause().await;
    let calls = fx.host.calls();
    let elapsed = fx.state.elapsed_millis();

    // When: Pausing again, with time passing
    tokio::time::sleep(Duration::from_secs(3)).await;
    fx.controller.pause().await;

    // Then: Same state, no extra host calls
    assert_eq!(fx.state.elapsed_millis(), elapsed);
    assert!(!fx.state.is_tracking());
    assert_eq!(fx.host.calls(), calls);
}

/// WHAT: Pause offers Resume and freezes the displayed time
/// WHY: The notification is the only UI while backgrounded
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_tracking_when_pausing_then_notification_offers_resume() {
    // Given: A run of 1.5 s
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // When: Pausing
    fx.controller.pause().await;

    // Then: Last update shows the frozen time with Resume
    let last = fx.host.updates().pop().unwrap();
    assert_eq!(last, NotificationContent::for_run(1500, false));
    assert_eq!(last.action, NotificationAction::Resume);
    assert_eq!(last.text, "00:00:01");

    // And the frozen total was snapshotted
    let snapshot = wait_for_snapshot(&fx.store, |s| s.elapsed_millis == 1500).await;
    assert!(snapshot.is_some());
}

/// WHAT: Start while tracking changes nothing
/// WHY: A duplicate start must not add an empty segment
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_tracking_when_starting_again_then_no_new_segment() {
    // Given: A started run
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;

    // When: Starting again
    fx.controller.start_or_resume().await;

    // Then: One segment, one foreground entry, one subscription
    assert_eq!(fx.state.path().len(), 1);
    let entries = fx
        .host
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HostCall::EnterForeground(_)))
        .count();
    assert_eq!(entries, 1);
    assert_eq!(fx.location.subscriber_count(), 1);
    assert!(fx.state.is_tracking());

    fx.controller.pause().await;
}

/// WHAT: Discard clears the session, the snapshot, and foreground mode
/// WHY: A discarded run must never come back after a restart
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_tracked_run_with_snapshot_when_discarding_then_everything_cleared() {
    // Given: A run long enough to have written a snapshot
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;
    fx.location.emit(ORIGIN);
    settle().await;
    tokio::time::sleep(Duration::from_millis(5020)).await;
    wait_for_snapshot(&fx.store, |s| s.elapsed_millis >= 5000)
        .await
        .unwrap();

    // When: Discarding
    fx.controller.discard().await;

    // Then: Empty, idle, nothing on disk, foreground left
    assert!(!fx.state.is_tracking());
    assert_eq!(fx.state.elapsed_millis(), 0);
    assert!(fx.state.path().is_empty());
    assert!(fx.store.restore().is_none());
    assert_eq!(fx.host.calls().last(), Some(&HostCall::Exit));

    // And a cold start finds nothing
    let restarted = Fixture::new(dir.path());
    assert!(!restarted.controller.on_cold_start().await);
}

/// WHAT: Finalize saves computed stats and resets the session
/// WHY: The saved record is the run's permanent summary
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_hundred_meter_run_when_finalizing_then_record_saved() {
    // Given: Two fixes 100 m apart over three seconds
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;
    fx.location.emit(ORIGIN);
    settle().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    fx.location.emit(north_of(ORIGIN, 100.0));
    settle().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    fx.controller.pause().await;

    // When: Finalizing
    let record = fx.controller.finalize().await.unwrap().unwrap();

    // Then: Stats match the path and time
    assert!((record.distance_meters - 100.0).abs() < 0.5, "got {}", record.distance_meters);
    assert_eq!(record.duration_millis, 3000);
    assert_eq!(record.calories_burned, 6);
    assert!((record.avg_speed_kmh - 120.0).abs() < 1.0, "got {}", record.avg_speed_kmh);
    assert!(record.path_image.is_none());
    assert_eq!(fx.history.records(), vec![record]);

    // And the session is reset
    assert_eq!(fx.state.elapsed_millis(), 0);
    assert!(fx.state.path().is_empty());
    assert!(fx.store.restore().is_none());
    assert_eq!(fx.host.calls().last(), Some(&HostCall::Exit));
}

/// WHAT: Finalize with nothing recorded saves nothing
/// WHY: Empty runs would clutter the history
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_empty_session_when_finalizing_then_nothing_saved() {
    // Given: A fresh session
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());

    // When: Finalizing
    let record = fx.controller.finalize().await.unwrap();

    // Then: Nothing saved
    assert!(record.is_none());
    assert!(fx.history.records().is_empty());
}

/// WHAT: A failed save keeps the run paused and restorable
/// WHY: A full disk must not throw away a finished run
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_history_when_finalizing_then_session_kept_for_retry() {
    // Given: A one second run and a failing history store
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.history.set_failing(true);
    fx.controller.start_or_resume().await;
    fx.location.emit(ORIGIN);
    settle().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    // When: Finalizing
    let result = fx.controller.finalize().await;

    // Then: Error returned, session intact and paused
    assert!(result.is_err());
    assert!(!fx.state.is_tracking());
    assert_eq!(fx.state.elapsed_millis(), 1000);
    assert_eq!(fx.state.path(), vec![vec![ORIGIN]]);
    let snapshot = wait_for_snapshot(&fx.store, |s| s.elapsed_millis == 1000).await;
    assert!(snapshot.is_some());

    // And a retry succeeds
    fx.history.set_failing(false);
    let record = fx.controller.finalize().await.unwrap().unwrap();
    assert_eq!(record.duration_millis, 1000);
    assert_eq!(fx.history.records().len(), 1);
}

/// WHAT: Fixes delivered after pause are not recorded
/// WHY: Walking around while paused must not add distance
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_paused_session_when_fix_arrives_then_path_unchanged() {
    // Given: A paused run with one point
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.controller.start_or_resume().await;
    fx.location.emit(ORIGIN);
    settle().await;
    fx.controller.pause().await;

    // When: A fix arrives
    fx.location.emit(north_of(ORIGIN, 500.0));
    settle().await;

    // Then: Path unchanged
    assert_eq!(fx.state.path(), vec![vec![ORIGIN]]);
    assert_eq!(fx.controller.stats().distance_meters, 0.0);
}

/// WHAT: Cold start ignores a snapshot with negative time or impossible points
/// WHY: A damaged file must not turn into a saved run with bogus stats
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_out_of_range_snapshot_when_cold_starting_then_idle_and_cleared() {
    // Given: A readable snapshot with negative time and latitude 500
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    std::fs::write(
        fx.store.file_path(),
        r#"{"time_in_millis":-5000,"path_points":[[{"lat":37.5,"lng":127.0},{"lat":500.0,"lng":127.0}]]}"#,
    )
    .unwrap();

    // When: Cold starting
    let restored = fx.controller.on_cold_start().await;

    // Then: Nothing restored, the file is gone
    assert!(!restored);
    assert_eq!(fx.state.elapsed_millis(), 0);
    assert!(fx.state.path().is_empty());
    assert!(!fx.store.file_path().exists());

    // And finalizing saves nothing
    assert!(fx.controller.finalize().await.unwrap().is_none());
    assert!(fx.history.records().is_empty());
}

/// WHAT: A restored elapsed time near the integer limit saturates instead of overflowing
/// WHY: Pause runs on the command path and must never crash the process
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_snapshot_near_time_limit_when_resuming_and_pausing_then_elapsed_saturates() {
    // Given: A snapshot ten milliseconds below the limit
    let dir = tempdir().unwrap();
    let fx = Fixture::new(dir.path());
    fx.store
        .persist(&Snapshot::new(i64::MAX - 10, Vec::new()))
        .unwrap();
    assert!(fx.controller.on_cold_start().await);

    // When: Running for a second, then pausing
    fx.controller.start_or_resume().await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    fx.controller.pause().await;

    // Then: Elapsed pinned at the limit, session paused
    assert_eq!(fx.state.elapsed_millis(), i64::MAX);
    assert!(!fx.state.is_tracking());
}
