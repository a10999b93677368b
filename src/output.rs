//! HTTP trace persistence.
//!
//! Each handled API call appends one JSON object per line to a trace file,
//! independent of the regular `tracing` log output.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Extra context attached to successful calls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TraceMeta {
    pub period: String,
    pub country: String,
    pub count: usize,
}

/// One line of the trace file, minus its timestamp.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TraceEntry {
    pub method: &'static str,
    pub endpoint: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TraceMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct TimestampedEntry<'a> {
    timestamp: String,
    #[serde(flatten)]
    entry: &'a TraceEntry,
}

/// Append-only JSON-lines trace file.
#[derive(Debug, Clone)]
pub struct TraceLog {
    path: PathBuf,
}

impl TraceLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry`, logging instead of failing if the file is unwritable.
    pub fn record(&self, entry: &TraceEntry) {
        if let Err(e) = append_trace(&self.path, entry) {
            error!(path = %self.path.display(), error = %e, "Failed to write trace entry");
        }
    }
}

/// Appends a timestamped [`TraceEntry`] as a single JSON line.
///
/// Creates the parent directory and the file if they do not already exist.
pub fn append_trace(path: &Path, entry: &TraceEntry) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    debug!(path = %path.display(), endpoint = entry.endpoint, "Appending trace entry");

    let line = serde_json::to_string(&TimestampedEntry {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        entry,
    })?;

    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    writeln!(file, "{line}")?;

    Ok(())
}
