//! Logging macros with `format!`-style arguments
//!
//! Each macro formats its arguments and calls the matching [`Writer`]
//! method with an empty context, returning its `Result`.
//!
//! ```
//! use rust_log_facade::prelude::*;
//! use rust_log_facade::info;
//!
//! let writer = Writer::new(Logger::new("production"));
//!
//! let port = 8080;
//! info!(writer, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```
//!
//! [`Writer`]: crate::Writer

/// Log a formatted message at a [`LogLevel`](crate::LogLevel).
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let writer = Writer::new(Logger::new("production"));
/// use rust_log_facade::log;
/// log!(writer, LogLevel::Error, "Error code: {}", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($writer:expr, $level:expr, $($arg:tt)+) => {
        $writer.log_at($level, format!($($arg)+), $crate::LogContext::new())
    };
}

#[macro_export]
macro_rules! debug {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Notice, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[macro_export]
macro_rules! alert {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Alert, $($arg)+)
    };
}

/// Log an emergency-level message: the system is unusable.
#[macro_export]
macro_rules! emergency {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Emergency, $($arg)+)
    };
}
