//! Appender implementations

pub mod error_log;
pub mod file;
pub mod rotating_file;
pub mod syslog;

pub use error_log::ErrorLogAppender;
pub use file::FileAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy};
#[cfg(unix)]
pub use syslog::SyslogAppender;
pub use syslog::SyslogFacility;

// Re-export the trait so appenders can be implemented from this module alone
pub use crate::core::Appender;
