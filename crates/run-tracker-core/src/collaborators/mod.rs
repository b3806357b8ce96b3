//! Contracts for the services the engine consumes but does not own.

mod gps_status;
mod history;
mod host;
mod location;

pub use {
    gps_status::GpsStatusSource,
    history::{RunHistoryStore, RunRecord},
    host::{ForegroundHost, NOTIFICATION_TITLE, NotificationAction, NotificationContent},
    location::{LocationFix, LocationSource},
};
