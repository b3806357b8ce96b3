use crate::geo::format_stopwatch;

/// Title shown on the ongoing-run notification.
pub const NOTIFICATION_TITLE: &str = "Running";

/// The single action offered on the ongoing-run notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Offered while tracking.
    Pause,
    /// Offered while paused.
    Resume,
}

impl NotificationAction {
    /// Button label for the action.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationAction::Pause => "Pause",
            NotificationAction::Resume => "Resume",
        }
    }
}

/// Complete notification contents.
///
/// Built from scratch for every update; hosts replace whatever they showed
/// before instead of patching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Notification title.
    pub title: String,
    /// Formatted elapsed time.
    pub text: String,
    /// Pause or resume button.
    pub action: NotificationAction,
}

impl NotificationContent {
    /// Builds the notification for `elapsed_millis` in the given tracking state.
    pub fn for_run(elapsed_millis: i64, tracking: bool) -> Self {
        let action = if tracking {
            NotificationAction::Pause
        } else {
            NotificationAction::Resume
        };

        Self {
            title: NOTIFICATION_TITLE.to_string(),
            text: format_stopwatch(elapsed_millis, false),
            action,
        }
    }
}

/// Platform service that keeps the engine alive while the app is not visible.
///
/// Calls are fire-and-forget; implementations must not block.
pub trait ForegroundHost: Send + Sync {
    /// Enters foreground execution, showing `content`.
    fn enter_foreground(&self, content: NotificationContent);

    /// Replaces the visible notification with `content`.
    fn update_notification(&self, content: NotificationContent);

    /// Leaves foreground execution and removes the notification.
    fn exit(&self);
}
