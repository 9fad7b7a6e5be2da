//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod global;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod sink;
pub mod span;
pub mod timestamp;
pub mod wrap;

pub use config::{log_file_uri, LoggerConfig, OutputFormat, LOG_FILE_NAME};
pub use encoder::JsonEncoder;
pub use engine::Core;
pub use error::{LoggerError, Result};
pub use global::{init, logger, production_logger};
pub use log_context::{FieldValue, LogContext, IGNORED_KEY};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{FatalHook, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::{register_series, CounterBank, LOG_LINES_TOTAL};
pub use registry::{register_global, register_os_sinks, SinkFactory, SinkRegistry, PRETTY_SCHEME};
pub use sink::{Destination, SinkUri};
pub use span::{SpanContext, TRACE_ID_KEY};
pub use timestamp::TimestampFormat;
pub use wrap::{wrap, BoxError, ContextError, NamedFn};
