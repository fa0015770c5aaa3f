#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Logging shared by the trainer and the diagnosis server: console tracing
//! setup plus an append-only JSON-lines run log.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

/// Installs the global console subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Component emitting the log (`trn`, `diagnosis_server`).
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Metrics and identifiers attached to the event.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl LogRecord {
    /// Creates a record with the provided info.
    #[must_use]
    pub fn new(module: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.into(),
            level,
            message: message.into(),
            metadata: Map::new(),
        }
    }

    /// Merges the fields of a JSON object into the metadata; other values land under `data`.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        match metadata {
            Value::Object(map) => self.metadata.extend(map),
            Value::Null => {}
            other => {
                self.metadata.insert("data".into(), other);
            }
        }
        self
    }
}

/// Thread-safe JSON-lines logger with append-only semantics.
#[derive(Debug)]
pub struct JsonLogger {
    path: PathBuf,
    module: String,
    writer: Mutex<File>,
}

impl JsonLogger {
    /// Creates or opens a logger at the desired path for `module`.
    pub fn new(path: impl AsRef<Path>, module: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            module: module.into(),
            writer: Mutex::new(file),
        })
    }

    /// Writes a log record as JSON line.
    pub fn log(&self, record: &LogRecord) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Builds a record for this logger's module and writes it.
    pub fn event(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        self.log(&LogRecord::new(self.module.clone(), level, message).with_metadata(metadata))
    }

    /// Returns the underlying file path (useful for tests).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn writes_json_lines() {
        let dir = tempdir().unwrap();
        let logger = JsonLogger::new(dir.path().join("runs/train.jsonl"), "trn").unwrap();
        logger
            .event(LogLevel::Info, "training complete", json!({ "accuracy": 0.95 }))
            .unwrap();
        logger.event(LogLevel::Warn, "second", Value::Null).unwrap();
        let content = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: LogRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.module, "trn");
        assert_eq!(first.level, LogLevel::Info);
        assert_eq!(first.metadata["accuracy"], json!(0.95));
        assert!(!lines[1].contains("metadata"));
    }

    #[test]
    fn non_object_metadata_is_wrapped() {
        let record = LogRecord::new("trn", LogLevel::Debug, "scalar").with_metadata(json!(3));
        assert_eq!(record.metadata["data"], json!(3));
    }

    #[test]
    fn tracing_init_is_idempotent() {
        init_tracing("info");
        init_tracing("debug");
    }
}
