//! The logging facade
//!
//! [`Writer`] exposes one method per severity plus a generic `log`/`write`.
//! Every call formats the message payload, publishes a [`LogEvent`] to the
//! attached dispatcher (if any) and hands the record to the engine, which
//! writes it to every appender whose threshold it meets.

use crate::appenders::{ErrorLogAppender, FileAppender, RotatingFileAppender, SyslogFacility};
use crate::core::{LineFormatter, LogContext, LogLevel, Logger, Message, Result};
use crate::events::{self, EventDispatcher, Listener, LogEvent, LOG_EVENT};
use std::path::PathBuf;
use std::sync::{Arc, Weak};

pub struct Writer {
    logger: Logger,
    dispatcher: Option<Weak<dyn EventDispatcher>>,
}

impl Writer {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            dispatcher: None,
        }
    }

    /// Create a writer that publishes log events to `dispatcher`.
    ///
    /// Only a weak reference is kept; once the dispatcher is dropped the
    /// writer silently stops publishing.
    #[must_use]
    pub fn with_event_dispatcher(logger: Logger, dispatcher: Weak<dyn EventDispatcher>) -> Self {
        Self {
            logger,
            dispatcher: Some(dispatcher),
        }
    }

    pub fn debug(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Debug, message.into(), context)
    }

    pub fn info(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Info, message.into(), context)
    }

    pub fn notice(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Notice, message.into(), context)
    }

    pub fn warning(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Warning, message.into(), context)
    }

    pub fn error(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Error, message.into(), context)
    }

    pub fn critical(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Critical, message.into(), context)
    }

    pub fn alert(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Alert, message.into(), context)
    }

    pub fn emergency(&self, message: impl Into<Message>, context: LogContext) -> Result<()> {
        self.write_log(LogLevel::Emergency, message.into(), context)
    }

    /// Log at a level given by name.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidArgument`] for an unknown level name;
    /// nothing is published or written in that case. Appender failures are
    /// returned as-is.
    ///
    /// [`LoggerError::InvalidArgument`]: crate::core::LoggerError::InvalidArgument
    pub fn log(&self, level: &str, message: impl Into<Message>, context: LogContext) -> Result<()> {
        let level = LogLevel::parse(level)?;
        self.write_log(level, message.into(), context)
    }

    /// Alias of [`Writer::log`]
    pub fn write(
        &self,
        level: &str,
        message: impl Into<Message>,
        context: LogContext,
    ) -> Result<()> {
        self.log(level, message, context)
    }

    /// Log at an already resolved level
    pub fn log_at(
        &self,
        level: LogLevel,
        message: impl Into<Message>,
        context: LogContext,
    ) -> Result<()> {
        self.write_log(level, message.into(), context)
    }

    fn write_log(&self, level: LogLevel, message: Message, context: LogContext) -> Result<()> {
        let message = message.format();
        self.fire_log_event(level, &message, &context);
        self.logger.log(level, message, context)
    }

    fn fire_log_event(&self, level: LogLevel, message: &str, context: &LogContext) {
        if let Some(dispatcher) = self.event_dispatcher() {
            let event = LogEvent {
                level,
                message: message.to_string(),
                context: context.clone(),
            };
            events::publish(dispatcher.as_ref(), &event);
        }
    }

    /// Register a callback for log events with the attached dispatcher.
    ///
    /// Returns `false` when there is no dispatcher or it supports neither
    /// subscribe entry point.
    pub fn listen<F>(&self, callback: F) -> bool
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        match self.event_dispatcher() {
            Some(dispatcher) => {
                let listener: Listener = Arc::new(callback);
                events::subscribe(dispatcher.as_ref(), LOG_EVENT, listener)
            }
            None => false,
        }
    }

    /// Attach a file appender writing to `path`
    ///
    /// # Errors
    ///
    /// Fails with [`LoggerError::InvalidArgument`] for an unknown level and
    /// with an I/O error when the file cannot be opened.
    ///
    /// [`LoggerError::InvalidArgument`]: crate::core::LoggerError::InvalidArgument
    pub fn use_files(&mut self, path: impl Into<PathBuf>, level: &str) -> Result<()> {
        let level = LogLevel::parse(level)?;
        let appender = FileAppender::new(path, level)?
            .with_formatter(Self::default_formatter());
        self.logger.add_appender(Box::new(appender));
        Ok(())
    }

    /// Attach a daily rotating appender keeping at most `days` files
    /// (0 keeps all of them)
    pub fn use_daily_files(
        &mut self,
        path: impl Into<PathBuf>,
        days: usize,
        level: &str,
    ) -> Result<()> {
        let level = LogLevel::parse(level)?;
        let appender = RotatingFileAppender::new(path.into(), days, level)?
            .with_formatter(Self::default_formatter());
        self.logger.add_appender(Box::new(appender));
        Ok(())
    }

    /// Attach a syslog appender identified as `name`
    #[cfg(unix)]
    pub fn use_syslog(&mut self, name: &str, level: &str, facility: SyslogFacility) -> Result<()> {
        use crate::appenders::SyslogAppender;

        let level = LogLevel::parse(level)?;
        let appender = SyslogAppender::new(name, facility, level)?
            .with_formatter(Self::default_formatter());
        self.logger.add_appender(Box::new(appender));
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn use_syslog(
        &mut self,
        _name: &str,
        level: &str,
        _facility: SyslogFacility,
    ) -> Result<()> {
        LogLevel::parse(level)?;
        Err(crate::core::LoggerError::config(
            "syslog",
            "Syslog is only available on Unix platforms",
        ))
    }

    /// Attach an appender writing to the process error stream
    pub fn use_error_log(&mut self, level: &str) -> Result<()> {
        let level = LogLevel::parse(level)?;
        let appender =
            ErrorLogAppender::new(level).with_formatter(Self::default_formatter());
        self.logger.add_appender(Box::new(appender));
        Ok(())
    }

    /// Formatter shared by the appenders this writer attaches: multi-line
    /// entries allowed, exception source chains included
    pub fn default_formatter() -> LineFormatter {
        LineFormatter::new()
            .allow_inline_line_breaks(true)
            .include_stacktraces(true)
    }

    /// Get the underlying engine
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Get the underlying engine for direct configuration
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Get the event dispatcher, if one is attached and still alive
    pub fn event_dispatcher(&self) -> Option<Arc<dyn EventDispatcher>> {
        self.dispatcher.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_event_dispatcher(&mut self, dispatcher: Weak<dyn EventDispatcher>) {
        self.dispatcher = Some(dispatcher);
    }

    pub fn clear_event_dispatcher(&mut self) {
        self.dispatcher = None;
    }

    pub fn flush(&self) -> Result<()> {
        self.logger.flush()
    }
}

impl From<Logger> for Writer {
    fn from(logger: Logger) -> Self {
        Self::new(logger)
    }
}
