// src/telemetry.rs
//
// JSONL metrics sink for evaluation runs.
//
// One JSON object per line, controlled by environment variables so
// experiments can turn logging on/off without code changes:
// - REPLIQ_TELEMETRY_MODE: "off" (default) or "jsonl"
// - REPLIQ_TELEMETRY_PATH: path to the JSONL file
//
// Write failures disable the sink instead of crashing the control loop.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One metrics record per polled tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Seconds since the start of the run.
    pub time: f64,
    /// Predicted average read latency (ms).
    pub avg_latency: f64,
    /// Total storage cost across the cluster.
    pub total_cost: f64,
    /// Composite reward for the tick, present for RL consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
}

pub struct MetricsSink {
    enabled: bool,
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl Default for MetricsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink {
    /// Create a disabled sink.
    pub fn new() -> Self {
        Self {
            enabled: false,
            path: None,
            writer: None,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        let enabled = env::var("REPLIQ_TELEMETRY_MODE")
            .map(|s| s.to_lowercase() == "jsonl")
            .unwrap_or(false);

        let path = env::var("REPLIQ_TELEMETRY_PATH").ok().map(PathBuf::from);

        Self {
            enabled,
            path,
            writer: None,
        }
    }

    /// Enable logging to a specific path.
    pub fn enable(path: PathBuf) -> Self {
        Self {
            enabled: true,
            path: Some(path),
            writer: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn ensure_writer(&mut self) -> Option<&mut BufWriter<File>> {
        if !self.enabled {
            return None;
        }

        if self.writer.is_none() {
            let path = self.path.as_ref()?;

            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()?;

            self.writer = Some(BufWriter::new(file));
        }

        self.writer.as_mut()
    }

    /// Append one record as a JSON line.
    pub fn log(&mut self, record: &MetricsRecord) {
        let Some(writer) = self.ensure_writer() else {
            return;
        };

        let line = match serde_json::to_string(record) {
            Ok(s) => s,
            Err(_) => return,
        };

        if writeln!(writer, "{}", line).is_err() {
            self.enabled = false;
            self.writer = None;
        }
    }

    pub fn flush(&mut self) {
        if let Some(writer) = &mut self.writer {
            let _ = writer.flush();
        }
    }
}

impl Drop for MetricsSink {
    fn drop(&mut self) {
        self.flush();
    }
}
