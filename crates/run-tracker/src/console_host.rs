use run_tracker_core::{ForegroundHost, NotificationContent};

use tracing::{debug, info};

/// Foreground host for a terminal session.
///
/// There is no OS service to keep alive, so the notification is rendered
/// into the log instead.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl ForegroundHost for ConsoleHost {
    fn enter_foreground(&self, content: NotificationContent) {
        info!(
            title = %content.title,
            text = %content.text,
            action = content.action.label(),
            "Foreground started"
        );
    }

    fn update_notification(&self, content: NotificationContent) {
        debug!(
            title = %content.title,
            text = %content.text,
            action = content.action.label(),
            "Notification"
        );
    }

    fn exit(&self) {
        info!("Foreground stopped");
    }
}
