use crate::{
    GpsMonitor, SessionState,
    tests::fakes::{FakeGpsStatusSource, settle},
};

use std::sync::Arc;

/// WHAT: GPS status values are mirrored into session state
/// WHY: The UI shows a warning when location services are off
#[tokio::test(start_paused = true)]
async fn given_monitor_when_gps_toggles_then_state_follows() {
    // Given: A monitor over a fake source
    let state = Arc::new(SessionState::new());
    let source = FakeGpsStatusSource::new();
    let monitor = GpsMonitor::spawn(&source, Arc::clone(&state));
    assert!(state.gps_enabled());

    // When: GPS is switched off
    source.emit(false);
    settle().await;

    // Then: State reflects it
    assert!(!state.gps_enabled());

    // And back on
    source.emit(true);
    settle().await;
    assert!(state.gps_enabled());
    assert!(!monitor.is_finished());
}

/// WHAT: Dropping the monitor stops forwarding
/// WHY: A torn-down session must not keep writing state
#[tokio::test(start_paused = true)]
async fn given_dropped_monitor_when_gps_toggles_then_state_unchanged() {
    // Given: A monitor that has been dropped
    let state = Arc::new(SessionState::new());
    let source = FakeGpsStatusSource::new();
    drop(GpsMonitor::spawn(&source, Arc::clone(&state)));
    settle().await;

    // When: GPS is switched off
    source.emit(false);
    settle().await;

    // Then: Still the default
    assert!(state.gps_enabled());
}
