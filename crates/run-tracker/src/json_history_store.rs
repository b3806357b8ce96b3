//! Append-only run history in JSON-lines format.

use run_tracker_core::{CoreResult, RunHistoryStore, RunRecord, TrackerError};

use std::{
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Stores one [`RunRecord`] per line.
#[derive(Debug, Clone)]
pub struct JsonLinesHistoryStore {
    path: PathBuf,
}

impl JsonLinesHistoryStore {
    /// Creates a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads every saved run. Unparseable lines are skipped.
    ///
    /// Blocking; call from the blocking pool inside async code.
    #[track_caller]
    pub fn load_all(&self) -> CoreResult<Vec<RunRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TrackerError::history_store(format!(
                    "Failed to open {:?}: {}",
                    self.path, e
                )));
            }
        };

        let mut records = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                TrackerError::history_store(format!("Failed to read {:?}: {}", self.path, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = number + 1, error = %e, "Skipping corrupt history line"),
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl RunHistoryStore for JsonLinesHistoryStore {
    #[instrument(skip(self, record), fields(path = ?self.path))]
    async fn save(&self, record: RunRecord) -> CoreResult<()> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || append_line(&path, &record))
            .await
            .map_err(|e| TrackerError::history_store(format!("History task failed: {}", e)))??;

        debug!("Run appended to history");
        Ok(())
    }
}

fn append_line(path: &Path, record: &RunRecord) -> CoreResult<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| TrackerError::history_store(format!("Failed to encode run: {}", e)))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            TrackerError::history_store(format!("Failed to create {:?}: {}", parent, e))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TrackerError::history_store(format!("Failed to open {:?}: {}", path, e)))?;

    writeln!(file, "{}", line)
        .and_then(|()| file.sync_data())
        .map_err(|e| TrackerError::history_store(format!("Failed to write {:?}: {}", path, e)))
}
