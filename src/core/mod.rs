//! Core engine types and traits

pub mod appender;
pub mod error;
pub mod formatter;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod timestamp;

pub use appender::Appender;
pub use error::{LoggerError, Result};
pub use formatter::LineFormatter;
pub use log_context::{ExceptionDetail, FieldMap, FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_CHANNEL};
pub use message::{Loggable, Message};
pub use timestamp::TimestampFormat;
