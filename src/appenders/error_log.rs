//! Error log appender: writes records to the process's OS error stream
//!
//! For a service this is stderr, which the host (systemd journal, container
//! runtime, web server) collects as the application's error log.

use crate::core::{Appender, LineFormatter, LogEntry, LogLevel, Result};
use std::io::{self, Write};

pub struct ErrorLogAppender {
    level: LogLevel,
    formatter: LineFormatter,
    target: Box<dyn Write + Send + Sync>,
    expand_newlines: bool,
}

impl ErrorLogAppender {
    /// Write to stderr at the given threshold
    pub fn new(level: LogLevel) -> Self {
        Self::with_writer(level, io::stderr())
    }

    /// Write to any stream instead of stderr
    pub fn with_writer(level: LogLevel, target: impl Write + Send + Sync + 'static) -> Self {
        Self {
            level,
            formatter: LineFormatter::default(),
            target: Box::new(target),
            expand_newlines: false,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: LineFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Emit every line of a multi-line record as its own error log line,
    /// dropping empty lines
    #[must_use]
    pub fn with_expand_newlines(mut self, expand: bool) -> Self {
        self.expand_newlines = expand;
        self
    }
}

impl Appender for ErrorLogAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let formatted = self.formatter.format(entry);

        if self.expand_newlines {
            for line in formatted.split(['\r', '\n']).filter(|l| !l.is_empty()) {
                self.target.write_all(line.as_bytes())?;
                self.target.write_all(b"\n")?;
            }
        } else {
            self.target.write_all(formatted.as_bytes())?;
            if !formatted.ends_with('\n') {
                self.target.write_all(b"\n")?;
            }
        }

        self.target.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.target.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "errorlog"
    }

    fn min_level(&self) -> LogLevel {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_formatted_line() {
        let buffer = SharedBuffer::default();
        let mut appender = ErrorLogAppender::with_writer(LogLevel::Debug, buffer.clone());

        appender
            .append(&LogEntry::new(LogLevel::Warning, "low disk").with_channel("testing"))
            .unwrap();

        let output = buffer.contents();
        assert!(output.ends_with("testing.WARNING: low disk []\n"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_expand_newlines_splits_record() {
        let buffer = SharedBuffer::default();
        let mut appender = ErrorLogAppender::with_writer(LogLevel::Debug, buffer.clone())
            .with_formatter(LineFormatter::with_format("%message%").allow_inline_line_breaks(true))
            .with_expand_newlines(true);

        appender
            .append(&LogEntry::new(LogLevel::Error, "first\n\nsecond\r\nthird"))
            .unwrap();

        assert_eq!(buffer.contents(), "first\nsecond\nthird\n");
    }

    #[test]
    fn test_threshold_and_name() {
        let appender = ErrorLogAppender::new(LogLevel::Critical);
        assert_eq!(appender.name(), "errorlog");
        assert!(!appender.is_handling(LogLevel::Error));
        assert!(appender.is_handling(LogLevel::Alert));
    }
}
