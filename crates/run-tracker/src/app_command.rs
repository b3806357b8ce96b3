use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands sent from the console reader to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new run, or resume the paused one.
    StartOrResume,
    /// Pause the current run.
    Pause,
    /// Discard the current run without saving.
    Stop,
    /// Save the current run to history.
    Finalize,
    /// Log live statistics.
    Status,
    /// Request application shutdown.
    Shutdown,
}

impl FromStr for AppCommand {
    type Err = AppError;

    /// Parses one console line. Case-insensitive, surrounding whitespace ignored.
    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let word = input.trim().to_ascii_lowercase();

        match word.as_str() {
            "start" | "resume" => Ok(AppCommand::StartOrResume),
            "pause" => Ok(AppCommand::Pause),
            "stop" | "discard" => Ok(AppCommand::Stop),
            "save" | "finish" => Ok(AppCommand::Finalize),
            "status" => Ok(AppCommand::Status),
            "quit" | "exit" => Ok(AppCommand::Shutdown),
            _ => Err(AppError::UnknownCommand {
                input: input.trim().to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
