use crate::{AppCommand, AppResult};

use run_tracker_core::{GpsMonitor, GpsStatusSource, SessionController, geo::format_stopwatch};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Main application state.
///
/// Owns the session controller and applies console commands to it one at a
/// time, in arrival order.
pub struct App {
    pub(crate) controller: Arc<SessionController>,
    pub(crate) gps_source: Arc<dyn GpsStatusSource>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    /// Correlates log lines of one run; assigned on start or restore.
    pub(crate) run_id: Option<Uuid>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Run-Tracker starting");

        if self.controller.on_cold_start().await {
            let run_id = Uuid::new_v4();
            self.run_id = Some(run_id);
            info!(
                run_id = %run_id,
                elapsed = %format_stopwatch(self.controller.state().elapsed_millis(), false),
                "Interrupted run restored; send `resume` to continue"
            );
        }

        let gps_monitor =
            GpsMonitor::spawn(self.gps_source.as_ref(), Arc::clone(self.controller.state()));

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    self.handle_command(cmd).await;
                }

                else => {
                    info!("Command channel closed, shutting down");
                    break;
                }
            }
        }

        drop(gps_monitor);

        // Leave an unfinished run paused with a fresh snapshot so the next
        // launch can restore it.
        if self.controller.state().is_tracking() {
            self.controller.pause().await;
            info!(run_id = ?self.run_id, "Run paused for restore on next launch");
        }

        let _ = self.shutdown_tx.send(true);
        info!("Run-Tracker shut down successfully");

        Ok(())
    }

    #[instrument(skip(self), fields(run_id = ?self.run_id))]
    async fn handle_command(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::StartOrResume => {
                let run_id = *self.run_id.get_or_insert_with(Uuid::new_v4);
                self.controller.start_or_resume().await;
                info!(run_id = %run_id, "Tracking");
            }
            AppCommand::Pause => {
                self.controller.pause().await;
                self.log_status();
            }
            AppCommand::Stop => {
                self.controller.discard().await;
                let run_id = self.run_id.take();
                info!(run_id = ?run_id, "Run discarded");
            }
            AppCommand::Finalize => match self.controller.finalize().await {
                Ok(Some(record)) => {
                    let run_id = self.run_id.take();
                    info!(
                        run_id = ?run_id,
                        distance_m = %format!("{:.1}", record.distance_meters),
                        duration = %format_stopwatch(record.duration_millis, false),
                        avg_speed_kmh = %format!("{:.2}", record.avg_speed_kmh),
                        calories = record.calories_burned,
                        "Run saved"
                    );
                }
                Ok(None) => {
                    self.run_id = None;
                    warn!("Nothing recorded, nothing saved");
                }
                Err(e) => {
                    error!(error = ?e, "Failed to save run; it is paused and can be saved again");
                }
            },
            AppCommand::Status => self.log_status(),
            AppCommand::Shutdown => {}
        }
    }

    fn log_status(&self) {
        let state = self.controller.state();
        let stats = self.controller.stats();

        info!(
            run_id = ?self.run_id,
            tracking = state.is_tracking(),
            gps_enabled = state.gps_enabled(),
            elapsed = %format_stopwatch(state.elapsed_millis(), true),
            distance_m = %format!("{:.1}", stats.distance_meters),
            avg_speed_kmh = %format!("{:.2}", stats.avg_speed_kmh),
            calories = stats.calories_burned,
            "Status"
        );
    }
}
