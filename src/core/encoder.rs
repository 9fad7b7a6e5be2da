//! Record encoding
//!
//! Records are encoded as one JSON object per line with the production key
//! names:
//!
//! `{"level":"info","ts":1736332245.123,"caller":"src/main.rs:10","msg":"started","port":8080}`
//!
//! Context fields follow `msg` in insertion order; `stacktrace` comes last.

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "ts";
pub const CALLER_KEY: &str = "caller";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Encodes entries into newline-terminated JSON lines.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    timestamp_format: TimestampFormat,
}

impl JsonEncoder {
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self { timestamp_format }
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    /// Encode `entry` as a single JSON line, including the trailing `\n`.
    pub fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(&Record {
            entry,
            timestamp_format: self.timestamp_format,
        })?;
        buf.push(b'\n');
        Ok(buf)
    }
}

struct Record<'a> {
    entry: &'a LogEntry,
    timestamp_format: TimestampFormat,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entry = self.entry;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(LEVEL_KEY, entry.level.as_str())?;
        map.serialize_entry(TIME_KEY, &self.timestamp_format.encode(&entry.timestamp))?;
        if let Some(ref caller) = entry.caller {
            map.serialize_entry(CALLER_KEY, caller)?;
        }
        map.serialize_entry(MESSAGE_KEY, &entry.message)?;
        for (key, value) in entry.context.fields() {
            map.serialize_entry(key, value)?;
        }
        if let Some(ref stacktrace) = entry.stacktrace {
            map.serialize_entry(STACKTRACE_KEY, stacktrace)?;
        }
        map.end()
    }
}
