//! Logging engine: a named channel and its ordered list of appenders

use super::{
    appender::Appender, error::Result, log_context::LogContext, log_entry::LogEntry,
    log_level::LogLevel,
};
use parking_lot::Mutex;

/// Channel used when none is configured
pub const DEFAULT_CHANNEL: &str = "production";

/// The engine behind the facade.
///
/// Records are written synchronously: a call returns once every appender
/// whose threshold the record meets has written it. Appenders are visited
/// in the order they were added. The first appender failure aborts the
/// write and is returned to the caller.
pub struct Logger {
    channel: String,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
}

impl Logger {
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            appenders: Mutex::new(Vec::new()),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        self.appenders.get_mut().push(appender);
    }

    /// Names of the attached appenders, in dispatch order
    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|appender| appender.name().to_string())
            .collect()
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.lock().len()
    }

    /// Whether at least one appender accepts records at `level`
    pub fn is_handling(&self, level: LogLevel) -> bool {
        self.appenders
            .lock()
            .iter()
            .any(|appender| appender.is_handling(level))
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        let entry = LogEntry::new(level, message)
            .with_channel(self.channel.as_str())
            .with_context(context);
        self.write_entry(&entry)
    }

    /// Hand a prepared entry to every appender that handles its level
    pub fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            if appender.is_handling(entry.level) {
                appender.append(entry)?;
            }
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Debug, message, context)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Info, message, context)
    }

    #[inline]
    pub fn notice(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Notice, message, context)
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Warning, message, context)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Error, message, context)
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Critical, message, context)
    }

    #[inline]
    pub fn alert(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Alert, message, context)
    }

    #[inline]
    pub fn emergency(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log(LogLevel::Emergency, message, context)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_log_facade::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .channel("staging")
    ///     .appender(ErrorLogAppender::new(LogLevel::Warning))
    ///     .build();
    /// assert_eq!(logger.channel(), "staging");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
pub struct LoggerBuilder {
    channel: String,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    pub fn build(self) -> Logger {
        let mut logger = Logger::new(self.channel);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use std::sync::Arc;

    struct Recording {
        name: String,
        level: LogLevel,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Appender for Recording {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.seen
                .lock()
                .push(format!("{}:{}:{}", self.name, entry.level.name(), entry.message));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn min_level(&self) -> LogLevel {
            self.level
        }
    }

    struct Failing;

    impl Appender for Failing {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::other("Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn recording(name: &str, level: LogLevel, seen: &Arc<Mutex<Vec<String>>>) -> Recording {
        Recording {
            name: name.to_string(),
            level,
            seen: Arc::clone(seen),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        assert_eq!(logger.channel(), DEFAULT_CHANNEL);
        assert_eq!(logger.appender_count(), 0);
        assert!(!logger.is_handling(LogLevel::Emergency));
    }

    #[test]
    fn test_dispatch_in_insertion_order_with_thresholds() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::builder()
            .channel("testing")
            .appender(recording("first", LogLevel::Debug, &seen))
            .appender(recording("second", LogLevel::Error, &seen))
            .build();

        assert_eq!(logger.appender_names(), vec!["first", "second"]);

        logger.info("hello", LogContext::new()).unwrap();
        logger.critical("down", LogContext::new()).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                "first:info:hello".to_string(),
                "first:critical:down".to_string(),
                "second:critical:down".to_string(),
            ]
        );
    }

    #[test]
    fn test_appender_failure_propagates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::new("testing");
        logger.add_appender(Box::new(Failing));
        logger.add_appender(Box::new(recording("after", LogLevel::Debug, &seen)));

        let result = logger.error("boom", LogContext::new());
        assert!(matches!(result, Err(LoggerError::Other(_))));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_is_handling() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::builder()
            .appender(recording("warn", LogLevel::Warning, &seen))
            .build();

        assert!(!logger.is_handling(LogLevel::Notice));
        assert!(logger.is_handling(LogLevel::Warning));
        assert!(logger.is_handling(LogLevel::Alert));
    }
}
