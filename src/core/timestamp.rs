//! Timestamp encoding for log records
//!
//! Records carry their timestamp under the `ts` key. The production default
//! is fractional epoch seconds; string formats are available for sinks that
//! are read by humans or by aggregation tools that expect ISO 8601.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Encoding of the `ts` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// Fractional seconds since the epoch: `1736332245.123456`
    #[default]
    EpochSeconds,

    /// Integer milliseconds since the epoch: `1736332245123`
    EpochMillis,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,
}

impl TimestampFormat {
    /// Encode `datetime` as the JSON value stored under `ts`.
    #[must_use]
    pub fn encode(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::EpochSeconds => {
                let secs = datetime.timestamp() as f64
                    + f64::from(datetime.timestamp_subsec_micros()) / 1_000_000.0;
                serde_json::Number::from_f64(secs)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
            TimestampFormat::EpochMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            TimestampFormat::Iso8601 => {
                serde_json::Value::String(format_iso8601(datetime))
            }
            TimestampFormat::Rfc3339 => serde_json::Value::String(datetime.to_rfc3339()),
        }
    }
}

/// Format as ISO 8601 UTC with millisecond precision.
#[must_use]
pub fn format_iso8601(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Decode a `ts` value written in any [`TimestampFormat`].
///
/// Numbers above 1e11 are taken as milliseconds, smaller ones as seconds.
pub fn decode(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(millis) = n.as_i64().filter(|m| m.unsigned_abs() > 100_000_000_000) {
                return Utc.timestamp_millis_opt(millis).single();
            }
            let secs = n.as_f64()?;
            let whole = secs.trunc();
            // f64 seconds only carry microsecond precision at current epochs
            let micros = ((secs - whole) * 1e6).round() as u32;
            Utc.timestamp_opt(whole as i64, micros.min(999_999) * 1_000).single()
        }
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}
