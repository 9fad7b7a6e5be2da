//! Leveled record engine
//!
//! [`Core`] owns the level gate, the encoder and the resolved destinations.
//! It never returns write errors to the caller: a destination that fails or
//! panics is reported on the error outputs and the remaining destinations
//! still receive the record.

use super::{
    encoder::JsonEncoder,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    sink::Destination,
    timestamp::format_iso8601,
};
use chrono::Utc;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub struct Core {
    level: LogLevel,
    encoder: JsonEncoder,
    outputs: Vec<Arc<dyn Destination>>,
    error_outputs: Vec<Arc<dyn Destination>>,
}

impl Core {
    pub fn new(
        level: LogLevel,
        encoder: JsonEncoder,
        outputs: Vec<Arc<dyn Destination>>,
        error_outputs: Vec<Arc<dyn Destination>>,
    ) -> Self {
        Self {
            level,
            encoder,
            outputs,
            error_outputs,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Encode `entry` and hand it to every output, if its level is enabled.
    pub fn write(&self, entry: &LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }

        let line = match self.encoder.encode(entry) {
            Ok(line) => line,
            Err(e) => {
                self.report(format_args!("encode error: {}", e));
                return;
            }
        };

        // Per-destination panic isolation: one broken destination must not
        // keep the record from the others.
        for output in &self.outputs {
            let result = catch_unwind(AssertUnwindSafe(|| output.write(&line)));
            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => self.report(format_args!("write error: {}", e)),
                Err(panic_info) => self.report(format_args!(
                    "write error: destination {:?} panicked: {}",
                    output.name(),
                    panic_message(panic_info.as_ref())
                )),
            }
        }
    }

    /// Sync every destination.
    ///
    /// All destinations are synced even if one fails; the first failure is
    /// returned as-is.
    pub fn sync(&self) -> Result<()> {
        let mut first_error: Option<LoggerError> = None;
        for dest in self.outputs.iter().chain(self.error_outputs.iter()) {
            if let Err(e) = dest.sync() {
                first_error.get_or_insert(LoggerError::Io(e));
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write an internal failure to the error outputs, best effort.
    fn report(&self, message: fmt::Arguments<'_>) {
        let line = format!("{} {}\n", format_iso8601(&Utc::now()), message);
        for dest in &self.error_outputs {
            let _ = catch_unwind(AssertUnwindSafe(|| dest.write(line.as_bytes())));
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
