//! # Rust Log Facade
//!
//! A leveled logging facade over a synchronous logging engine, with a sink
//! configurator and optional event publishing.
//!
//! ## Features
//!
//! - **Eight levels**: debug through emergency, each a method on [`Writer`]
//! - **Structured messages**: mappings and serializable values are rendered
//!   to text before they reach a sink
//! - **Sinks**: single file, daily rotating files, syslog, process error log
//! - **Events**: every record can be published to an [`EventDispatcher`]
//!
//! ```no_run
//! use rust_log_facade::prelude::*;
//!
//! let mut writer = Writer::new(Logger::new("production"));
//! writer.use_daily_files("/var/log/myapp/app.log", 7, "info")?;
//! writer.info("service started", LogContext::new().with_field("port", 8080))?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod bootstrap;
pub mod config;
pub mod core;
pub mod events;
pub mod macros;
pub mod writer;

pub mod prelude {
    pub use crate::appenders::{
        ErrorLogAppender, FileAppender, RotatingFileAppender, RotationPolicy, SyslogFacility,
    };
    pub use crate::bootstrap::{bootstrap, create_writer, create_writer_with, Host, SinkOptions};
    pub use crate::config::{ConfigProvider, HandlerKind, JsonConfig, LogConfig, MapConfig};
    pub use crate::core::{
        Appender, FieldMap, FieldValue, LineFormatter, LogContext, LogEntry, LogLevel, Loggable,
        Logger, LoggerError, Message, Result, TimestampFormat,
    };
    pub use crate::events::{EventBus, EventDispatcher, LogEvent};
    pub use crate::writer::Writer;
}

#[cfg(unix)]
pub use appenders::SyslogAppender;
pub use appenders::{
    ErrorLogAppender, FileAppender, RotatingFileAppender, RotationPolicy, SyslogFacility,
};
pub use bootstrap::{bootstrap, create_writer, create_writer_with, Host, SinkOptions};
pub use config::{ConfigProvider, HandlerKind, JsonConfig, LogConfig, MapConfig};
pub use core::{
    Appender, ExceptionDetail, FieldMap, FieldValue, LineFormatter, LogContext, LogEntry,
    LogLevel, Loggable, Logger, LoggerBuilder, LoggerError, Message, Result, TimestampFormat,
    DEFAULT_CHANNEL,
};
pub use events::{Delivery, EventBus, EventDispatcher, Listener, LogEvent, LOG_EVENT};
pub use writer::Writer;
