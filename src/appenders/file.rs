//! Single file appender: every record is appended to one ever-growing file

use crate::core::{Appender, LineFormatter, LogEntry, LogLevel, LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    level: LogLevel,
    formatter: LineFormatter,
    use_locking: bool,
}

impl FileAppender {
    /// Open (or create) `path` for appending, creating missing parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new(path: impl Into<PathBuf>, level: LogLevel) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            level,
            formatter: LineFormatter::default(),
            use_locking: false,
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: LineFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Hold an exclusive advisory lock on the file while each record is
    /// written, for files shared between processes.
    #[cfg(feature = "file")]
    #[must_use]
    pub fn with_locking(mut self, use_locking: bool) -> Self {
        self.use_locking = use_locking;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(feature = "file")]
    fn write_locked(writer: &mut BufWriter<File>, path: &Path, bytes: &[u8]) -> Result<()> {
        use fs2::FileExt;

        writer
            .get_ref()
            .lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;
        let written = writer.write_all(bytes).and_then(|()| writer.flush());
        let unlocked = writer.get_ref().unlock();
        written?;
        unlocked?;
        Ok(())
    }

    #[cfg(not(feature = "file"))]
    fn write_locked(writer: &mut BufWriter<File>, _path: &Path, bytes: &[u8]) -> Result<()> {
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        let mut output = self.formatter.format(entry);
        if !output.ends_with('\n') {
            output.push('\n');
        }

        if self.use_locking {
            Self::write_locked(writer, &self.path, output.as_bytes())
        } else {
            writer.write_all(output.as_bytes()).map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
            writer.flush()?;
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn min_level(&self) -> LogLevel {
        self.level
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("app.log");

        let mut appender = FileAppender::new(&path, LogLevel::Debug).unwrap();
        appender
            .append(&LogEntry::new(LogLevel::Info, "ready").with_channel("testing"))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("testing.INFO: ready []"));
        assert_eq!(appender.path(), path);
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        for message in ["one", "two"] {
            let mut appender = FileAppender::new(&path, LogLevel::Debug).unwrap();
            appender.append(&LogEntry::new(LogLevel::Info, message)).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_custom_template_gets_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut appender = FileAppender::new(&path, LogLevel::Debug)
            .unwrap()
            .with_formatter(LineFormatter::with_format("%level_name% %message%"));
        appender.append(&LogEntry::new(LogLevel::Alert, "a")).unwrap();
        appender.append(&LogEntry::new(LogLevel::Alert, "b")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ALERT a\nALERT b\n");
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_locked_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.log");

        let mut appender = FileAppender::new(&path, LogLevel::Debug)
            .unwrap()
            .with_locking(true);
        for i in 0..3 {
            appender
                .append(&LogEntry::new(LogLevel::Info, format!("locked {}", i)))
                .unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_threshold() {
        let dir = tempdir().unwrap();
        let appender = FileAppender::new(dir.path().join("a.log"), LogLevel::Error).unwrap();
        assert!(!appender.is_handling(LogLevel::Warning));
        assert!(appender.is_handling(LogLevel::Error));
    }
}
