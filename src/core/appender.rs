//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Severity threshold of this appender
    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }

    /// Whether a record at `level` reaches this appender
    fn is_handling(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }
}
