//! Timestamped console output.
//!
//! Every heartbeat and lifecycle line goes through a [`LogSink`] as
//! `[YYYY-MM-DD HH:MM:SS] <message>` in local wall-clock time.

use std::io::Write;

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;

/// Timestamp layout for log lines (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for formatted log lines.
///
/// Implementations must serialize concurrent writes themselves; the worker
/// thread and the controlling thread share one sink.
pub trait LogSink: Send + Sync {
    /// Write one complete line. Failures are swallowed.
    fn write_line(&self, line: &str);
}

/// Writes lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines containing `pattern`.
    pub fn count_containing(&self, pattern: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|line| line.contains(pattern))
            .count()
    }

    /// Drop everything collected so far.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Format a message with the given timestamp.
pub fn format_line<Tz>(timestamp: &DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// Write `message` to `sink`, stamped with the current local time.
pub fn log_message(sink: &dyn LogSink, message: &str) {
    sink.write_line(&format_line(&Local::now(), message));
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
