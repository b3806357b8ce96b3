//! Run-Tracker: console host for the run tracking session engine.
//!
//! Reads `start`, `pause`, `stop`, `save`, `status` and `quit` from stdin and
//! drives a session fed by a simulated location source.

mod app;
mod app_command;
mod command_reader;
mod config;
mod console_host;
mod error;
mod json_history_store;
mod simulated_location;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    command_reader::CommandReader,
    console_host::ConsoleHost,
    error::{AppError, Result as AppResult},
    json_history_store::JsonLinesHistoryStore,
    simulated_location::{SimulatedLocationSource, StaticGpsStatus},
};

use crate::config::Config;

use run_tracker_core::{
    Collaborators, ForegroundHost, LocationSource, RunHistoryStore, SessionController,
    SessionState, SnapshotStore,
};

use std::{io::BufReader, sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "run_tracker=debug,run_tracker_core=debug";

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    let history = Arc::new(JsonLinesHistoryStore::new(&config.storage.history_path));
    match history.load_all() {
        Ok(runs) => info!(
            history_path = ?config.storage.history_path,
            saved_runs = runs.len(),
            "Run history loaded"
        ),
        Err(e) => error!(error = ?e, "Failed to read run history; new runs will still be appended"),
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let state = Arc::new(SessionState::new());
        let store = Arc::new(SnapshotStore::new(&config.storage.snapshot_path));
        let collaborators = Collaborators {
            location: Arc::new(SimulatedLocationSource::from_config(&config.simulation))
                as Arc<dyn LocationSource>,
            host: Arc::new(ConsoleHost) as Arc<dyn ForegroundHost>,
            history: history as Arc<dyn RunHistoryStore>,
        };
        let controller = SessionController::new(
            state,
            store,
            collaborators,
            config.tracking.coordinator_config(),
        )
        .with_calorie_policy(Arc::new(config.tracking.calorie_policy()));

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let command_reader = CommandReader::new(command_tx);

        let app = App {
            controller: Arc::new(controller),
            gps_source: Arc::new(StaticGpsStatus::new(config.simulation.gps_enabled)),
            command_rx,
            shutdown_tx,
            run_id: None,
        };

        tokio::join!(
            async {
                let stdin = BufReader::new(std::io::stdin());
                if let Err(e) = command_reader.run(stdin, shutdown_rx).await {
                    error!(error = ?e, "Command reader error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));
}
