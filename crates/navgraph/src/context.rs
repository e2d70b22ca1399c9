//! Logging sinks for navigation mesh construction and queries
//!
//! Every component accepts a [`LogSink`] at construction time instead of
//! reaching for a process-wide logger. Without one, [`NullSink`] is used and
//! nothing is emitted.

use std::sync::{Arc, Mutex, MutexGuard};
use web_time::Instant;

/// Log level for sink messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Debug level messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warning messages
    Warning = 2,
    /// Error messages
    Error = 3,
}

impl LogLevel {
    /// Short upper-case label used when printing
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Destination for diagnostic messages
pub trait LogSink: Send + Sync {
    /// Records a single message
    fn log(&self, level: LogLevel, message: &str);
}

/// Shared handle to a sink, cloned into every component that logs
pub type SharedSink = Arc<dyn LogSink>;

/// Returns the default sink, which discards everything
pub fn null_sink() -> SharedSink {
    Arc::new(NullSink)
}

/// Sink that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Sink that forwards to the `log` crate facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => log::debug!(target: "navgraph", "{}", message),
            LogLevel::Info => log::info!(target: "navgraph", "{}", message),
            LogLevel::Warning => log::warn!(target: "navgraph", "{}", message),
            LogLevel::Error => log::error!(target: "navgraph", "{}", message),
        }
    }
}

/// Log entry containing message and metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp when log was created
    pub timestamp: Instant,
    /// Log message
    pub message: String,
}

#[derive(Debug)]
struct RecordingState {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
    max_entries: usize,
}

/// Sink that keeps messages in memory, for inspection by tools and tests
#[derive(Debug)]
pub struct RecordingSink {
    state: Mutex<RecordingState>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// Creates a sink that records debug messages and above, keeping the last 1000
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RecordingState {
                entries: Vec::new(),
                min_level: LogLevel::Debug,
                max_entries: 1000,
            }),
        }
    }

    /// Creates a recording sink wrapped in an [`Arc`] so it can be injected
    /// and still inspected afterwards
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        // A poisoned lock only means a panic happened mid-push; the buffer is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sets the minimum log level
    pub fn set_log_level(&self, level: LogLevel) {
        self.lock().min_level = level;
    }

    /// Sets the maximum number of log entries to keep
    pub fn set_max_entries(&self, max_entries: usize) {
        let mut state = self.lock();
        state.max_entries = max_entries;
        let excess = state.entries.len().saturating_sub(max_entries);
        state.entries.drain(..excess);
    }

    /// Snapshot of all recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    /// Entries recorded at exactly `level`
    pub fn entries_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Messages only, in recording order
    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Renders all entries, one per line
    pub fn render(&self) -> String {
        self.lock()
            .entries
            .iter()
            .map(|entry| format!("{} {}\n", entry.level.label(), entry.message))
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: LogLevel, message: &str) {
        let mut state = self.lock();
        if level < state.min_level || state.max_entries == 0 {
            return;
        }

        state.entries.push(LogEntry {
            level,
            timestamp: Instant::now(),
            message: message.to_string(),
        });

        if state.entries.len() > state.max_entries {
            state.entries.remove(0);
        }
    }
}
