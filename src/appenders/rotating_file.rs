//! Daily rotating file appender
//!
//! Records are written to a file named after the base path plus the local
//! date of the record, e.g. `logs/app.log` becomes `logs/app-2025-01-08.log`.
//! When a record for a new day arrives the appender switches files and
//! removes the oldest dated files beyond the retention limit. Rotation only
//! moves forward: a record dated before the current file's day is written to
//! the current file.

use crate::core::{Appender, LineFormatter, LogEntry, LogLevel, LoggerError, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Retention settings for a rotating file appender
///
/// # Examples
///
/// ```
/// use rust_log_facade::appenders::RotationPolicy;
///
/// // Keep a week of logs, gzip each day once it is over
/// let policy = RotationPolicy::new()
///     .with_max_files(7)
///     .with_compression(true);
/// assert_eq!(policy.max_files, 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum number of dated files to keep, current one included
    /// (0 keeps everything)
    pub max_files: usize,
    /// Whether to gzip a day's file once the next day starts
    pub compress: bool,
}

impl RotationPolicy {
    /// Create a policy with unlimited retention and no compression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Rotating file appender that starts a new file every day
///
/// # Examples
///
/// ```no_run
/// use rust_log_facade::appenders::{RotatingFileAppender, RotationPolicy};
/// use rust_log_facade::LogLevel;
///
/// let policy = RotationPolicy::new().with_max_files(14);
/// let appender =
///     RotatingFileAppender::with_policy("/var/log/app.log", policy, LogLevel::Info).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    level: LogLevel,
    formatter: LineFormatter,
    writer: Option<BufWriter<File>>,
    current_date: Option<NaiveDate>,
}

impl RotatingFileAppender {
    /// Create a daily appender keeping at most `max_files` files
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be created
    pub fn new<P: AsRef<Path>>(path: P, max_files: usize, level: LogLevel) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::new().with_max_files(max_files), level)
    }

    /// Create a daily appender with a custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be created
    pub fn with_policy<P: AsRef<Path>>(
        path: P,
        policy: RotationPolicy,
        level: LogLevel,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        Ok(Self {
            base_path,
            policy,
            level,
            formatter: LineFormatter::default(),
            writer: None,
            current_date: None,
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: LineFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Path of the file currently written to, if any record was written
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_date.map(|date| self.dated_path(date))
    }

    /// Path of the file holding records for `date`
    #[must_use]
    pub fn dated_path(&self, date: NaiveDate) -> PathBuf {
        let (stem, extension) = self.name_parts();
        let file_name = match extension {
            Some(ext) => format!("{}-{}.{}", stem, date.format(DATE_FORMAT), ext),
            None => format!("{}-{}", stem, date.format(DATE_FORMAT)),
        };
        self.base_path.with_file_name(file_name)
    }

    fn name_parts(&self) -> (String, Option<String>) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let extension = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);
        (stem, extension)
    }

    /// Date encoded in a file name produced by [`Self::dated_path`], with
    /// or without a trailing `.gz`
    fn date_of(&self, file_name: &str) -> Option<NaiveDate> {
        let (stem, extension) = self.name_parts();
        let name = file_name.strip_suffix(".gz").unwrap_or(file_name);
        let rest = name.strip_prefix(&format!("{}-", stem))?;
        let date = match extension {
            Some(ext) => rest.strip_suffix(&format!(".{}", ext))?,
            None => rest,
        };
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }

    /// Switch to the file for `date`
    fn rotate(&mut self, date: NaiveDate) -> Result<()> {
        let previous = self.current_path();

        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let path = self.dated_path(date);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_date = Some(date);

        if self.policy.compress {
            if let Some(previous) = previous.filter(|p| *p != path && p.exists()) {
                if let Err(e) = Self::compress_file(&previous) {
                    eprintln!("[WARN] Failed to compress rotated log file: {}", e);
                }
            }
        }

        self.prune();
        Ok(())
    }

    /// Delete the oldest dated files beyond `max_files`
    fn prune(&self) {
        if self.policy.max_files == 0 {
            return;
        }

        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "[WARN] Failed to list log directory {}: {}",
                    dir.display(),
                    e
                );
                return;
            }
        };

        let mut dated: Vec<(NaiveDate, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let date = self.date_of(name.to_str()?)?;
                Some((date, entry.path()))
            })
            .collect();

        // Newest first; the plain file sorts before its .gz twin
        dated.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let mut kept_dates: Vec<NaiveDate> = Vec::new();
        for (date, path) in dated {
            if kept_dates.contains(&date) || kept_dates.len() < self.policy.max_files {
                if !kept_dates.contains(&date) {
                    kept_dates.push(date);
                }
                continue;
            }

            if let Err(e) = fs::remove_file(&path) {
                eprintln!(
                    "[WARN] Failed to remove expired log file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    /// Compress a log file with transactional safety using streaming I/O
    ///
    /// The original file is only deleted after compression fully succeeded.
    /// An existing archive for the same day gets the file as an extra gzip
    /// member.
    fn compress_file(path: &Path) -> Result<()> {
        use std::io::{copy, BufReader};

        let mut gz_name = path.as_os_str().to_os_string();
        gz_name.push(".gz");
        let gz_path = PathBuf::from(gz_name);
        let mut tmp_name = gz_path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let temp_gz_path = PathBuf::from(tmp_name);

        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to open file for compression: {}", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&temp_gz_path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!(
                    "Failed to create temporary compressed file: {}",
                    temp_gz_path.display()
                ),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let streamed = copy(&mut reader, &mut encoder)
            .and_then(|_| encoder.finish())
            .and_then(|mut inner| inner.flush());
        if let Err(e) = streamed {
            let _ = fs::remove_file(&temp_gz_path);
            return Err(LoggerError::io_operation(
                "compress log file",
                format!("Failed to compress {}", path.display()),
                e,
            ));
        }

        if gz_path.exists() {
            Self::append_member(&temp_gz_path, &gz_path)?;
        } else {
            fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
                let _ = fs::remove_file(&temp_gz_path);
                LoggerError::io_operation(
                    "compress log file",
                    format!("Failed to rename compressed file to: {}", gz_path.display()),
                    e,
                )
            })?;
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[WARN] Compression succeeded but failed to remove original file {}: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }

    /// Append the gzip member in `member` to the archive at `gz_path`
    fn append_member(member: &Path, gz_path: &Path) -> Result<()> {
        let appended = File::open(member).and_then(|mut input| {
            let mut output = OpenOptions::new().append(true).open(gz_path)?;
            std::io::copy(&mut input, &mut output)?;
            output.flush()
        });
        let _ = fs::remove_file(member);

        appended.map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to append to compressed file: {}", gz_path.display()),
                e,
            )
        })
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "daily"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let date = entry.timestamp.with_timezone(&Local).date_naive();
        match self.current_date {
            Some(current) if self.writer.is_some() && date <= current => {}
            _ => self.rotate(date)?,
        }

        let mut formatted = self.formatter.format(entry);
        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer
            .write_all(formatted.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.level
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
