//! Host log abstraction.
//!
//! Adapters never print; everything user-visible goes through a [`LogSink`]
//! supplied by the host. [`TracingLogSink`] forwards to `tracing` for
//! standalone use, [`RecordingLogSink`] keeps messages in memory for tests and
//! the CLI's summary output.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Destination for messages addressed to the host's log.
pub trait LogSink: Send + Sync {
    fn log_event(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.log_event(Severity::Info, message);
    }

    fn error(&self, message: &str) {
        self.log_event(Severity::Error, message);
    }
}

/// Forwards host log messages to `tracing` under the `flumore::host` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log_event(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "flumore::host", "{message}"),
            Severity::Warning => tracing::warn!(target: "flumore::host", "{message}"),
            Severity::Error => tracing::error!(target: "flumore::host", "{message}"),
        }
    }
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingLogSink {
    entries: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl RecordingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<(Severity, String)> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for RecordingLogSink {
    fn log_event(&self, severity: Severity, message: &str) {
        let entry = (severity, message.to_string());
        match self.entries.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
