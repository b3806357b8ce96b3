mod controller;
mod coordinator;
mod gps_monitor;
mod state;

pub use {
    controller::{Collaborators, SessionController},
    coordinator::{
        CoordinatorConfig, DEFAULT_PERSIST_INTERVAL, DEFAULT_TICK_INTERVAL, TrackingCoordinator,
    },
    gps_monitor::GpsMonitor,
    state::SessionState,
};
