use crate::config::LoggingConfig;
use crate::errors::RosterError;
use crate::log_retention::{enforce_total_budget, rotate_if_needed, LogFamily, MAX_LOG_GENERATIONS};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_DISK_BUDGET_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
    pub budget_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
        }
    }

    /// `None` when no log path is configured.
    pub fn from_config(cfg: &LoggingConfig) -> Option<Self> {
        cfg.path.as_ref().map(|path| Self {
            path: path.clone(),
            max_payload_bytes: cfg.max_payload_bytes,
            budget_bytes: cfg.budget_bytes,
        })
    }

    /// Size at which the active log is rotated to a numbered generation.
    pub fn generation_bytes(&self) -> u64 {
        (self.budget_bytes / MAX_LOG_GENERATIONS).max(1)
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), RosterError> {
        let family = LogFamily::for_path(&self.path)?;
        fs::create_dir_all(family.dir()).map_err(|e| RosterError::Io(e.to_string()))?;
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let mut line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| RosterError::Io(e.to_string()))?;
        line.push('\n');

        let _ = rotate_if_needed(&family, line.len() as u64, self.generation_bytes())?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RosterError::Io(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| RosterError::Io(e.to_string()))?;

        let _ = enforce_total_budget(&family, self.budget_bytes)?;
        Ok(())
    }
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut cut = max_bytes.saturating_sub(3);
    while cut > 0 && !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    Value::String(format!("{}...", &rendered[..cut]))
}
