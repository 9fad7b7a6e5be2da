//! # Node Logger
//!
//! Process-wide structured logging with pluggable, URI-addressed sinks.
//!
//! ## Features
//!
//! - **Sink registry**: destinations are named by URI (`stderr`,
//!   `file:///var/log/node.jsonl`, `pretty://console`) and resolved through
//!   factories registered per scheme
//! - **Pretty console**: JSON records rendered as aligned, colored lines;
//!   anything that is not a record passes through untouched
//! - **Line counters**: one counter per level, bumped on every call and
//!   exported as `log_lines_total{level}`
//! - **Error helpers**: `warn_if`, `error_if`, `error_if_calling` and
//!   `panic_if` log a failed result and keep going (or stop)
//!
//! ## Quick Start
//!
//! ```
//! use node_logger::prelude::*;
//!
//! let logger = Logger::new(LoggerConfig::development())?;
//! logger.infow("listening", [("port", 8080)]);
//!
//! let port = 8080;
//! node_logger::debugf!(logger, "bound to {}", port);
//! # Ok::<(), node_logger::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CounterBank, Destination, FieldValue, LogContext, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, NamedFn, OutputFormat, Result, SinkRegistry, SinkUri,
        SpanContext, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, PrettyConsole};
}

pub use crate::core::global;
pub use crate::core::{
    init, logger, production_logger, register_global, wrap, BoxError, ContextError, CounterBank,
    Destination, FatalHook, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, NamedFn, OutputFormat, Result, SinkFactory, SinkRegistry, SinkUri,
    SpanContext, TimestampFormat, LOG_LINES_TOTAL, TRACE_ID_KEY,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, PrettyConsole};
