//! Building the facade for an application host
//!
//! [`create_writer`] resolves a [`LogConfig`] from the host, creates the
//! engine under the resolved channel, hands the host's dispatcher to the
//! facade and attaches one sink through [`configure`]. [`bootstrap`] does the
//! same but stores the writer on the host, and leaves a host that already
//! carries one untouched. [`create_writer_with`] skips resolution and takes
//! the options as given, which is the only way to choose a syslog facility.
//!
//! ```no_run
//! use rust_log_facade::bootstrap::{bootstrap, Host};
//! use rust_log_facade::config::MapConfig;
//! use rust_log_facade::LogContext;
//!
//! let mut host = Host::new()
//!     .with_environment("production")
//!     .with_storage_path("/var/lib/myapp")
//!     .with_config(MapConfig::new().with("app.log", "daily"));
//!
//! bootstrap(&mut host)?;
//! if let Some(writer) = host.writer() {
//!     writer.info("booted", LogContext::new())?;
//! }
//! # Ok::<(), rust_log_facade::LoggerError>(())
//! ```

use crate::appenders::SyslogFacility;
use crate::config::{ConfigProvider, HandlerKind, LogConfig};
use crate::core::{LogLevel, Logger, LoggerError, Result};
use crate::events::EventDispatcher;
use crate::writer::Writer;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application name syslog records are sent under
pub const SYSLOG_IDENT: &str = "app";

/// Everything the facade needs from the application: configuration,
/// environment name, storage root, an optional dispatcher, and the writer
/// once one is built
#[derive(Default)]
pub struct Host {
    config: Option<Box<dyn ConfigProvider>>,
    environment: Option<String>,
    storage_path: Option<PathBuf>,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    writer: Option<Writer>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: impl ConfigProvider + 'static) -> Self {
        self.config = Some(Box::new(config));
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Attach a dispatcher. The host keeps it alive; writers built from the
    /// host only hold a weak reference.
    #[must_use]
    pub fn with_dispatcher<D: EventDispatcher + 'static>(mut self, dispatcher: Arc<D>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    #[must_use]
    pub fn with_writer(mut self, writer: Writer) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn config(&self) -> Option<&dyn ConfigProvider> {
        self.config.as_deref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    pub fn dispatcher(&self) -> Option<&Arc<dyn EventDispatcher>> {
        self.dispatcher.as_ref()
    }

    pub fn writer(&self) -> Option<&Writer> {
        self.writer.as_ref()
    }

    pub fn writer_mut(&mut self) -> Option<&mut Writer> {
        self.writer.as_mut()
    }

    pub fn take_writer(&mut self) -> Option<Writer> {
        self.writer.take()
    }
}

/// Options for one sink
#[derive(Debug, Clone, PartialEq)]
pub struct SinkOptions {
    /// Log file for file-based sinks
    pub path: Option<PathBuf>,
    pub level: LogLevel,
    /// Daily files kept, 0 keeps all
    pub max_files: usize,
    pub facility: SyslogFacility,
    pub ident: String,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            path: None,
            level: LogLevel::Debug,
            max_files: 0,
            facility: SyslogFacility::User,
            ident: SYSLOG_IDENT.to_string(),
        }
    }
}

impl SinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    #[must_use]
    pub fn with_facility(mut self, facility: SyslogFacility) -> Self {
        self.facility = facility;
        self
    }

    #[must_use]
    pub fn with_ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = ident.into();
        self
    }

    fn file_path(&self, kind: HandlerKind) -> Result<&Path> {
        self.path.as_deref().ok_or_else(|| {
            LoggerError::config(
                kind.name(),
                "No storage path available for the log file",
            )
        })
    }
}

impl From<&LogConfig> for SinkOptions {
    fn from(config: &LogConfig) -> Self {
        Self {
            path: config.log_path(),
            level: config.level,
            max_files: config.max_files,
            facility: config.facility,
            ident: SYSLOG_IDENT.to_string(),
        }
    }
}

/// Attach one sink of `kind` to the writer
pub fn configure(writer: &mut Writer, kind: HandlerKind, options: &SinkOptions) -> Result<()> {
    let level = options.level.name();
    match kind {
        HandlerKind::Single => writer.use_files(options.file_path(kind)?, level),
        HandlerKind::Daily => {
            writer.use_daily_files(options.file_path(kind)?, options.max_files, level)
        }
        HandlerKind::Syslog => writer.use_syslog(&options.ident, level, options.facility),
        HandlerKind::Errorlog => writer.use_error_log(level),
    }
}

/// Build a writer for `host` from its configuration
///
/// # Errors
///
/// Fails when the configuration cannot be resolved, when a file sink has no
/// storage root, or when the sink cannot be opened.
pub fn create_writer(host: &Host) -> Result<Writer> {
    let config = LogConfig::resolve(host)?;
    create_writer_with(host, &config)
}

/// Build a writer for `host` from options resolved elsewhere, such as
/// [`LogConfig::from_json_str`]. The host only contributes its dispatcher.
///
/// # Errors
///
/// Fails when a file sink has no storage root or the sink cannot be opened.
pub fn create_writer_with(host: &Host, config: &LogConfig) -> Result<Writer> {
    let mut writer = Writer::new(Logger::new(config.channel.clone()));
    if let Some(dispatcher) = host.dispatcher() {
        writer.set_event_dispatcher(Arc::downgrade(dispatcher));
    }

    configure(&mut writer, config.handler, &SinkOptions::from(config))?;
    Ok(writer)
}

/// Build and store the host's writer unless it already has one
pub fn bootstrap(host: &mut Host) -> Result<()> {
    if host.writer.is_some() {
        return Ok(());
    }

    let writer = create_writer(host)?;
    host.writer = Some(writer);
    Ok(())
}
