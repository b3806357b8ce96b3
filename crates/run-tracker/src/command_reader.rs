//! Console command reader.
//!
//! Reads one command per line from an input stream and forwards parsed
//! commands to the main application. End of input is treated as `quit`.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards console input to the app as [`AppCommand`]s.
pub struct CommandReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl CommandReader {
    /// Create a reader that sends to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the reader until `quit`, end of input, or a shutdown signal.
    #[instrument(skip(self, input, shutdown_rx))]
    pub async fn run<R>(&self, input: R, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()>
    where
        R: BufRead + Send + 'static,
    {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single blocking task that forwards raw lines.
        //
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Command reader shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("End of input");
                        self.send(AppCommand::Shutdown).await?;
                        break;
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    match line.parse::<AppCommand>() {
                        Ok(command) => {
                            self.send(command).await?;
                            if command == AppCommand::Shutdown {
                                break;
                            }
                        }
                        Err(e) => warn!(
                            error = %e,
                            "Expected start, resume, pause, stop, save, status or quit"
                        ),
                    }
                }
            }
        }

        drop(line_rx);

        // Best-effort join: the blocking task may be stuck waiting for input
        // that never arrives. It is cleaned up on process exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!("Input forwarder still blocked on read, will be cleaned up on exit"),
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        debug!(command = ?command, "Command received");
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
