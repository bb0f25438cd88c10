//! Syslog appender backed by the system's syslog(3). The appender itself is
//! only available on Unix-like platforms; [`SyslogFacility`] is available
//! everywhere so it can appear in configuration.
//!
//! Transport, framing and socket discovery are left to the C library:
//! records go through `openlog`/`syslog` with `LOG_PID`, so the daemon sees
//!
//! ```text
//! Jan  8 10:30:45 host app[4242]: production.ERROR: boom {"code":5}
//! ```

#[cfg(unix)]
use crate::core::{Appender, LineFormatter, LogEntry};
use crate::core::{LogLevel, LoggerError, Result};
#[cfg(unix)]
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::ffi::CString;
use std::fmt;
use std::str::FromStr;

/// Syslog facility a record is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyslogFacility {
    Kern,
    #[default]
    User,
    Mail,
    Daemon,
    Auth,
    Syslog,
    Lpr,
    News,
    Uucp,
    Cron,
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

impl SyslogFacility {
    pub fn name(&self) -> &'static str {
        match self {
            SyslogFacility::Kern => "kern",
            SyslogFacility::User => "user",
            SyslogFacility::Mail => "mail",
            SyslogFacility::Daemon => "daemon",
            SyslogFacility::Auth => "auth",
            SyslogFacility::Syslog => "syslog",
            SyslogFacility::Lpr => "lpr",
            SyslogFacility::News => "news",
            SyslogFacility::Uucp => "uucp",
            SyslogFacility::Cron => "cron",
            SyslogFacility::Local0 => "local0",
            SyslogFacility::Local1 => "local1",
            SyslogFacility::Local2 => "local2",
            SyslogFacility::Local3 => "local3",
            SyslogFacility::Local4 => "local4",
            SyslogFacility::Local5 => "local5",
            SyslogFacility::Local6 => "local6",
            SyslogFacility::Local7 => "local7",
        }
    }

    /// The `LOG_*` facility constant from `<syslog.h>`
    #[cfg(unix)]
    pub fn as_raw(&self) -> libc::c_int {
        match self {
            SyslogFacility::Kern => libc::LOG_KERN,
            SyslogFacility::User => libc::LOG_USER,
            SyslogFacility::Mail => libc::LOG_MAIL,
            SyslogFacility::Daemon => libc::LOG_DAEMON,
            SyslogFacility::Auth => libc::LOG_AUTH,
            SyslogFacility::Syslog => libc::LOG_SYSLOG,
            SyslogFacility::Lpr => libc::LOG_LPR,
            SyslogFacility::News => libc::LOG_NEWS,
            SyslogFacility::Uucp => libc::LOG_UUCP,
            SyslogFacility::Cron => libc::LOG_CRON,
            SyslogFacility::Local0 => libc::LOG_LOCAL0,
            SyslogFacility::Local1 => libc::LOG_LOCAL1,
            SyslogFacility::Local2 => libc::LOG_LOCAL2,
            SyslogFacility::Local3 => libc::LOG_LOCAL3,
            SyslogFacility::Local4 => libc::LOG_LOCAL4,
            SyslogFacility::Local5 => libc::LOG_LOCAL5,
            SyslogFacility::Local6 => libc::LOG_LOCAL6,
            SyslogFacility::Local7 => libc::LOG_LOCAL7,
        }
    }

    /// Priority argument for syslog(3): this facility or'ed with the
    /// severity of `level`
    #[cfg(unix)]
    pub fn priority(&self, level: LogLevel) -> libc::c_int {
        self.as_raw() | severity(level)
    }
}

#[cfg(unix)]
fn severity(level: LogLevel) -> libc::c_int {
    match level {
        LogLevel::Debug => libc::LOG_DEBUG,
        LogLevel::Info => libc::LOG_INFO,
        LogLevel::Notice => libc::LOG_NOTICE,
        LogLevel::Warning => libc::LOG_WARNING,
        LogLevel::Error => libc::LOG_ERR,
        LogLevel::Critical => libc::LOG_CRIT,
        LogLevel::Alert => libc::LOG_ALERT,
        LogLevel::Emergency => libc::LOG_EMERG,
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyslogFacility {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        let facility = match s.to_ascii_lowercase().as_str() {
            "kern" => SyslogFacility::Kern,
            "user" => SyslogFacility::User,
            "mail" => SyslogFacility::Mail,
            "daemon" => SyslogFacility::Daemon,
            "auth" => SyslogFacility::Auth,
            "syslog" => SyslogFacility::Syslog,
            "lpr" => SyslogFacility::Lpr,
            "news" => SyslogFacility::News,
            "uucp" => SyslogFacility::Uucp,
            "cron" => SyslogFacility::Cron,
            "local0" => SyslogFacility::Local0,
            "local1" => SyslogFacility::Local1,
            "local2" => SyslogFacility::Local2,
            "local3" => SyslogFacility::Local3,
            "local4" => SyslogFacility::Local4,
            "local5" => SyslogFacility::Local5,
            "local6" => SyslogFacility::Local6,
            "local7" => SyslogFacility::Local7,
            _ => {
                return Err(LoggerError::InvalidArgument(format!(
                    "Invalid syslog facility: '{}'",
                    s
                )))
            }
        };
        Ok(facility)
    }
}

/// Ident handed to the last `openlog` call.
///
/// syslog(3) keeps the ident pointer, so the string lives here until the
/// next `openlog` replaces it. Holding the lock across `syslog` keeps each
/// record under the ident of the appender that wrote it.
#[cfg(unix)]
static OPENED_IDENT: Mutex<Option<CString>> = parking_lot::const_mutex(None);

#[cfg(unix)]
pub struct SyslogAppender {
    ident: String,
    c_ident: CString,
    facility: SyslogFacility,
    level: LogLevel,
    formatter: LineFormatter,
}

#[cfg(unix)]
impl SyslogAppender {
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidArgument`] if `ident` contains a NUL byte
    pub fn new(
        ident: impl Into<String>,
        facility: SyslogFacility,
        level: LogLevel,
    ) -> Result<Self> {
        let ident = ident.into();
        let c_ident = CString::new(ident.as_str()).map_err(|_| {
            LoggerError::InvalidArgument(format!(
                "Syslog ident contains a NUL byte: {:?}",
                ident
            ))
        })?;

        Ok(Self {
            ident,
            c_ident,
            facility,
            level,
            formatter: LineFormatter::with_format("%channel%.%level_name%: %message% %context%"),
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: LineFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Message text for one record; NUL bytes would truncate it in C
    fn message(&self, entry: &LogEntry) -> Result<CString> {
        let body = self.formatter.format(entry);
        CString::new(body.trim_end_matches('\n').replace('\0', "\\0"))
            .map_err(|e| LoggerError::writer(format!("Unencodable syslog message: {}", e)))
    }
}

#[cfg(unix)]
impl Appender for SyslogAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let message = self.message(entry)?;
        let priority = self.facility.priority(entry.level);

        let mut opened = OPENED_IDENT.lock();
        if opened.as_deref() != Some(self.c_ident.as_c_str()) {
            let ident = self.c_ident.clone();
            // SAFETY: `ident` is moved into OPENED_IDENT right after the call
            // and the heap buffer it points to does not move, so the pointer
            // syslog(3) keeps stays valid until the next openlog.
            unsafe {
                libc::openlog(ident.as_ptr(), libc::LOG_PID, self.facility.as_raw());
            }
            *opened = Some(ident);
        }

        // "%s" keeps any '%' in the record from being read as a conversion
        let format = b"%s\0".as_ptr().cast::<libc::c_char>();
        // SAFETY: both arguments are NUL-terminated and outlive the call
        unsafe {
            libc::syslog(priority, format, message.as_ptr());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog"
    }

    fn min_level(&self) -> LogLevel {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_parse() {
        assert_eq!("local3".parse::<SyslogFacility>().unwrap(), SyslogFacility::Local3);
        assert_eq!("USER".parse::<SyslogFacility>().unwrap(), SyslogFacility::User);
        assert!("local9".parse::<SyslogFacility>().is_err());
        assert!("LOG_USER".parse::<SyslogFacility>().is_err());
        assert_eq!(SyslogFacility::default(), SyslogFacility::User);
    }

    #[cfg(unix)]
    #[test]
    fn test_facility_maps_to_libc_constants() {
        assert_eq!(SyslogFacility::Kern.as_raw(), libc::LOG_KERN);
        assert_eq!(SyslogFacility::User.as_raw(), libc::LOG_USER);
        assert_eq!(SyslogFacility::Daemon.as_raw(), libc::LOG_DAEMON);
        assert_eq!(SyslogFacility::Local7.as_raw(), libc::LOG_LOCAL7);
    }

    #[cfg(unix)]
    #[test]
    fn test_priority_combines_facility_and_severity() {
        assert_eq!(
            SyslogFacility::User.priority(LogLevel::Error),
            libc::LOG_USER | libc::LOG_ERR
        );
        assert_eq!(
            SyslogFacility::Local0.priority(LogLevel::Debug),
            libc::LOG_LOCAL0 | libc::LOG_DEBUG
        );
        assert_eq!(
            SyslogFacility::Kern.priority(LogLevel::Emergency),
            libc::LOG_KERN | libc::LOG_EMERG
        );
        assert_eq!(
            SyslogFacility::Mail.priority(LogLevel::Notice),
            libc::LOG_MAIL | libc::LOG_NOTICE
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_ident_with_nul_rejected() {
        let result = SyslogAppender::new("my\0app", SyslogFacility::User, LogLevel::Debug);
        assert!(matches!(result, Err(LoggerError::InvalidArgument(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_message_text() {
        let appender =
            SyslogAppender::new("myapp", SyslogFacility::User, LogLevel::Debug).unwrap();
        assert_eq!(appender.ident(), "myapp");

        let message = appender
            .message(&LogEntry::new(LogLevel::Error, "boom").with_channel("testing"))
            .unwrap();
        assert_eq!(message.to_str().unwrap(), "testing.ERROR: boom []");

        let message = appender
            .message(&LogEntry::new(LogLevel::Info, "a\0b 100%").with_channel("testing"))
            .unwrap();
        assert_eq!(message.to_str().unwrap(), "testing.INFO: a\\0b 100% []");
    }

    #[cfg(unix)]
    #[test]
    fn test_append_switches_ident() {
        let mut first = SyslogAppender::new("first", SyslogFacility::Local0, LogLevel::Debug)
            .unwrap();
        let mut second = SyslogAppender::new("second", SyslogFacility::Local1, LogLevel::Debug)
            .unwrap();

        first.append(&LogEntry::new(LogLevel::Debug, "one")).unwrap();
        assert_eq!(OPENED_IDENT.lock().as_deref(), Some(first.c_ident.as_c_str()));

        second.append(&LogEntry::new(LogLevel::Debug, "two")).unwrap();
        assert_eq!(OPENED_IDENT.lock().as_deref(), Some(second.c_ident.as_c_str()));
    }
}
