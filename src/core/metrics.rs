//! Per-level line counters
//!
//! One monotonic counter per [`LogLevel`], created up front. The facade bumps
//! the counter for a level once per emission call at that level, before the
//! level filter runs: the counters measure call-site pressure, not what
//! reached a sink. A `Debug` call on an `Info` logger still counts.
//!
//! Each increment is mirrored to the `metrics` facade as
//! `log_lines_total{level="<name>"}`, so a recorder installed by the process
//! (for example a Prometheus exporter) exposes the same numbers.

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Name of the exported counter metric.
pub const LOG_LINES_TOTAL: &str = "log_lines_total";

static GLOBAL: OnceLock<Arc<CounterBank>> = OnceLock::new();

/// Line counters, one per level.
///
/// # Example
///
/// ```
/// use node_logger::{CounterBank, LogLevel};
///
/// let bank = CounterBank::new();
/// bank.increment(LogLevel::Warn);
///
/// assert_eq!(bank.get(LogLevel::Warn), 1);
/// assert_eq!(bank.get(LogLevel::Error), 0);
/// ```
#[derive(Debug)]
pub struct CounterBank {
    lines: [AtomicU64; LogLevel::ALL.len()],
}

impl CounterBank {
    /// Create a bank with every counter at zero
    pub const fn new() -> Self {
        Self {
            lines: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    /// The process-wide bank shared by every logger that does not bring its own.
    ///
    /// First use registers every `log_lines_total` series with the installed
    /// recorder, so all seven levels are exported before their first line.
    pub fn global() -> &'static Arc<CounterBank> {
        GLOBAL.get_or_init(|| {
            register_series();
            Arc::new(CounterBank::new())
        })
    }

    /// Record one emission attempt at `level`, returning the previous count.
    #[inline]
    pub fn increment(&self, level: LogLevel) -> u64 {
        metrics::counter!(LOG_LINES_TOTAL, "level" => level.as_str()).increment(1);
        self.lines[level.index()].fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn get(&self, level: LogLevel) -> u64 {
        self.lines[level.index()].load(Ordering::Relaxed)
    }

    /// Current value of every counter, lowest level first.
    pub fn snapshot(&self) -> Vec<(LogLevel, u64)> {
        LogLevel::ALL
            .iter()
            .map(|&level| (level, self.get(level)))
            .collect()
    }

    /// Sum over all levels.
    pub fn total(&self) -> u64 {
        LogLevel::ALL.iter().map(|&level| self.get(level)).sum()
    }
}

/// Describe `log_lines_total` and create its series for every level at zero.
pub fn register_series() {
    metrics::describe_counter!(LOG_LINES_TOTAL, "Log lines emitted, by level");
    for level in LogLevel::ALL {
        metrics::counter!(LOG_LINES_TOTAL, "level" => level.as_str()).increment(0);
    }
}

impl Default for CounterBank {
    fn default() -> Self {
        Self::new()
    }
}
