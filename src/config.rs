//! Logging configuration
//!
//! Options are read from a [`ConfigProvider`] under the `app.*` keys and
//! resolved into a [`LogConfig`]:
//!
//! | Key | Default |
//! |---|---|
//! | `app.log` | `single` |
//! | `app.log_level` | `debug` |
//! | `app.log_max_files` | `5` (`0` without a provider); an explicit `0` keeps every file |
//! | `app.log_channel` | environment name, else `production` |
//! | `app.storage_path` | the host's storage path takes precedence |

use crate::appenders::SyslogFacility;
use crate::bootstrap::Host;
use crate::core::{LogLevel, LoggerError, Result, DEFAULT_CHANNEL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const KEY_HANDLER: &str = "app.log";
pub const KEY_LEVEL: &str = "app.log_level";
pub const KEY_MAX_FILES: &str = "app.log_max_files";
pub const KEY_CHANNEL: &str = "app.log_channel";
pub const KEY_STORAGE_PATH: &str = "app.storage_path";

/// Retention used for daily files when the provider does not set one
pub const DEFAULT_MAX_FILES: usize = 5;

/// Source of configuration values
pub trait ConfigProvider: Send + Sync {
    fn has(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory configuration
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigProvider for MapConfig {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// A JSON document, looked up by dotted path: `app.log` is `{"app": {"log": ..}}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonConfig(serde_json::Value);

impl JsonConfig {
    pub fn new(document: serde_json::Value) -> Self {
        Self(document)
    }

    pub fn document(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for JsonConfig {
    fn from(document: serde_json::Value) -> Self {
        Self(document)
    }
}

impl FromStr for JsonConfig {
    type Err = LoggerError;

    fn from_str(json: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }
}

impl ConfigProvider for JsonConfig {
    fn has(&self, key: &str) -> bool {
        lookup(&self.0, key).is_some()
    }

    fn get(&self, key: &str) -> Option<String> {
        match lookup(&self.0, key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.')
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Non-empty value of `key`
fn value_of(config: &dyn ConfigProvider, key: &str) -> Option<String> {
    if !config.has(key) {
        return None;
    }
    config
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Kind of sink the configurator attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    #[default]
    Single,
    Daily,
    Syslog,
    Errorlog,
}

impl HandlerKind {
    pub fn name(&self) -> &'static str {
        match self {
            HandlerKind::Single => "single",
            HandlerKind::Daily => "daily",
            HandlerKind::Syslog => "syslog",
            HandlerKind::Errorlog => "errorlog",
        }
    }

    /// Whether the sink writes under the storage root
    pub fn is_file_based(&self) -> bool {
        matches!(self, HandlerKind::Single | HandlerKind::Daily)
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandlerKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(HandlerKind::Single),
            "daily" => Ok(HandlerKind::Daily),
            "syslog" => Ok(HandlerKind::Syslog),
            "errorlog" => Ok(HandlerKind::Errorlog),
            other => Err(LoggerError::config(
                "handler",
                format!("Unsupported log handler: '{}'", other),
            )),
        }
    }
}

/// Resolved logging options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub handler: HandlerKind,
    pub level: LogLevel,
    pub max_files: usize,
    pub channel: String,
    pub storage_path: Option<PathBuf>,
    pub facility: SyslogFacility,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            handler: HandlerKind::Single,
            level: LogLevel::Debug,
            max_files: DEFAULT_MAX_FILES,
            channel: DEFAULT_CHANNEL.to_string(),
            storage_path: None,
            facility: SyslogFacility::User,
        }
    }
}

impl LogConfig {
    /// Resolve the options for `host` from its provider and defaults
    ///
    /// # Errors
    ///
    /// Unknown handler kinds and malformed retention counts are
    /// configuration errors; unknown levels are invalid arguments.
    pub fn resolve(host: &Host) -> Result<Self> {
        let config = host.config();
        let get = |key: &str| config.and_then(|c| value_of(c, key));

        let handler = match get(KEY_HANDLER) {
            Some(kind) => kind.parse()?,
            None => HandlerKind::Single,
        };

        let level = match get(KEY_LEVEL) {
            Some(level) => LogLevel::parse(&level)?,
            None => LogLevel::Debug,
        };

        let max_files = match (config, get(KEY_MAX_FILES)) {
            (None, _) => 0,
            (Some(_), None) => DEFAULT_MAX_FILES,
            (Some(_), Some(count)) => count.parse().map_err(|_| {
                LoggerError::config(
                    KEY_MAX_FILES,
                    format!("Expected a file count, got '{}'", count),
                )
            })?,
        };

        let channel = get(KEY_CHANNEL)
            .or_else(|| host.environment().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

        let storage_path = host
            .storage_path()
            .map(PathBuf::from)
            .or_else(|| get(KEY_STORAGE_PATH).map(PathBuf::from));

        Ok(Self {
            handler,
            level,
            max_files,
            channel,
            storage_path,
            facility: SyslogFacility::default(),
        })
    }

    /// Load options from a JSON document; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Unknown levels and facilities are invalid arguments, unknown handler
    /// kinds are configuration errors, anything else malformed is a JSON error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut document: serde_json::Value = serde_json::from_str(json)?;
        let field = |name: &str| document.get(name).and_then(serde_json::Value::as_str);

        if let Some(level) = field("level") {
            LogLevel::parse(level)?;
        }
        if let Some(kind) = field("handler") {
            kind.parse::<HandlerKind>()?;
        }
        if let Some(facility) = field("facility") {
            let facility = facility.parse::<SyslogFacility>()?;
            document["facility"] = facility.name().into();
        }

        Ok(serde_json::from_value(document)?)
    }

    /// `<storage>/logs/app.log`, when a storage root is known
    pub fn log_path(&self) -> Option<PathBuf> {
        self.storage_path
            .as_ref()
            .map(|root| root.join("logs").join("app.log"))
    }
}
