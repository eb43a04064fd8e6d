// Session log for asynchronous tick tracing
//
// Fire-and-forget async logging so the tick loop never waits on disk.
// Each effective tick becomes one JSON line that the replay tool can re-simulate.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::engine::{Snapshot, TickReport};
use crate::rules::RoundOutcome;
use crate::types::Direction;

/// One recorded tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub seed: u64,
    pub session: u32,
    pub round: u32,
    pub tick: u64,
    /// Committed directions, p1 first
    pub directions: [Direction; 2],
    pub outcome: Option<RoundOutcome>,
    /// Board after the tick was applied
    pub snapshot: Snapshot,
    pub timestamp: String,
}

impl SessionLogEntry {
    pub fn new(seed: u64, report: &TickReport, snapshot: Snapshot) -> Self {
        SessionLogEntry {
            seed,
            session: report.session,
            round: report.round,
            tick: report.tick,
            directions: report.directions,
            outcome: report.outcome,
            snapshot,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json_line(&self) -> Result<String, String> {
        serde_json::to_string(self)
            .map(|json| format!("{}\n", json))
            .map_err(|e| format!("Failed to serialize session log entry: {}", e))
    }
}

/// Shared session logger state
/// Uses Arc<Mutex<File>> so writes from spawned tasks stay in order of acquisition
#[derive(Clone)]
pub struct SessionLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl SessionLogger {
    /// Creates a new session logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Session logging enabled: {}", log_file_path);
                SessionLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create session log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled session logger (no-op)
    pub fn disabled() -> Self {
        SessionLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records a tick asynchronously (fire-and-forget)
    /// Must be called from within a tokio runtime
    pub fn log_tick(&self, entry: SessionLogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: SessionLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match entry.to_json_line() {
                Ok(line) => {
                    if let Err(e) = file.write_all(line.as_bytes()).await {
                        error!("Failed to write session log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush session log: {}", e);
                    }
                }
                Err(e) => error!("{}", e),
            }
        }
    }
}
