//! Logger configuration
//!
//! A [`LoggerConfig`] is a plain value: build it, hand it to
//! [`Logger::builder`](crate::Logger::builder), and it is consumed when the
//! logger is built. It can be assembled in code, deserialized with serde, or
//! read from the environment:
//!
//! | Variable       | Meaning                                        | Default |
//! |----------------|------------------------------------------------|---------|
//! | `LOG_LEVEL`    | active level (`debug`, `info`, ...)            | required |
//! | `JSON_CONSOLE` | raw JSON on the console instead of pretty text | `false` |
//! | `LOG_TO_DISK`  | also write `<ROOT>/log.jsonl`                  | `false` |
//! | `ROOT`         | directory for the log file                     | `$HOME/.node_logger` |

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::registry::{SinkRegistry, PRETTY_SCHEME};
use super::sink::{Destination, SinkUri};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Name of the log file written when disk output is enabled.
pub const LOG_FILE_NAME: &str = "log.jsonl";

/// How records look on console destinations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,

    /// Console destinations are routed through the pretty renderer.
    ///
    /// `stdout` and `console://stdout` become `pretty://stdout`; `stderr` and
    /// the other `console://...` outputs become `pretty://console`. Files and
    /// other schemes still receive JSON.
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Destination URIs for records
    pub output_paths: Vec<String>,
    /// Destination URIs for the logger's own write failures
    pub error_output_paths: Vec<String>,
    pub level: LogLevel,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    /// `dpanic` panics when set
    pub development: bool,
    /// Annotate records with the `file:line` of the call site
    pub add_caller: bool,
    /// Attach a stack trace to records at or above this level
    pub stacktrace_level: Option<LogLevel>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggerConfig {
    /// JSON to stderr at `info`, stack traces from `error` up.
    pub fn production() -> Self {
        Self {
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            level: LogLevel::Info,
            format: OutputFormat::Json,
            timestamp_format: TimestampFormat::EpochSeconds,
            development: false,
            add_caller: true,
            stacktrace_level: Some(LogLevel::Error),
        }
    }

    /// Pretty output at `debug`, stack traces from `warn` up, `dpanic` panics.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: OutputFormat::Pretty,
            timestamp_format: TimestampFormat::Iso8601,
            development: true,
            stacktrace_level: Some(LogLevel::Warn),
            ..Self::production()
        }
    }

    /// Production configuration for a node rooted at `dir`.
    ///
    /// The console gets pretty output unless `json_console` is set. With
    /// `to_disk`, [`log_file_uri`] is appended to both the record and the
    /// error outputs.
    pub fn for_node(
        dir: impl AsRef<Path>,
        json_console: bool,
        level: LogLevel,
        to_disk: bool,
    ) -> Self {
        let mut config = Self::production().with_level(level);
        if !json_console {
            config.output_paths = vec![format!("{PRETTY_SCHEME}://console")];
        }
        if to_disk {
            let destination = log_file_uri(dir);
            config.output_paths.push(destination.clone());
            config.error_output_paths.push(destination);
        }
        config
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let level: LogLevel = lookup("LOG_LEVEL").unwrap_or_default().parse()?;
        let json_console = parse_bool("JSON_CONSOLE", lookup("JSON_CONSOLE"))?;
        let to_disk = parse_bool("LOG_TO_DISK", lookup("LOG_TO_DISK"))?;
        let root = lookup("ROOT")
            .filter(|r| !r.trim().is_empty())
            .or_else(|| lookup("HOME").map(|home| format!("{home}/.node_logger")))
            .unwrap_or_else(|| ".".to_string());

        Ok(Self::for_node(root, json_console, level, to_disk))
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_error_output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    #[must_use]
    pub fn with_stacktrace_level(mut self, level: Option<LogLevel>) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Output paths after applying [`OutputFormat::Pretty`].
    pub fn effective_output_paths(&self) -> Result<Vec<String>> {
        let pretty = format!("{PRETTY_SCHEME}://console");
        let mut paths = Vec::with_capacity(self.output_paths.len());
        for path in &self.output_paths {
            let uri = SinkUri::parse(path)?;
            let path = if self.format == OutputFormat::Pretty && uri.scheme() == "console" {
                match uri.selector() {
                    "stdout" => format!("{PRETTY_SCHEME}://stdout"),
                    _ => pretty.clone(),
                }
            } else {
                path.clone()
            };
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Resolve every destination URI against `registry`.
    ///
    /// Returns `(outputs, error_outputs)`. The first URI that fails to
    /// resolve aborts the whole build.
    pub(crate) fn open_destinations(
        &self,
        registry: &SinkRegistry,
    ) -> Result<(Vec<Arc<dyn Destination>>, Vec<Arc<dyn Destination>>)> {
        let outputs = self
            .effective_output_paths()?
            .iter()
            .map(|path| registry.open(path))
            .collect::<Result<Vec<_>>>()?;
        let error_outputs = self
            .error_output_paths
            .iter()
            .map(|path| registry.open(path))
            .collect::<Result<Vec<_>>>()?;
        Ok((outputs, error_outputs))
    }
}

/// `file://` URI of the log file inside `dir`.
pub fn log_file_uri(dir: impl AsRef<Path>) -> String {
    let path = dir.as_ref().join(LOG_FILE_NAME);
    format!("file://{}", path.to_string_lossy().replace('\\', "/"))
}

fn parse_bool(key: &str, value: Option<String>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(LoggerError::config(key, format!("expected a boolean, got {other:?}"))),
    }
}
