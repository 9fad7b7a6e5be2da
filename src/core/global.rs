//! Process-wide logger
//!
//! The default instance is created once, either explicitly with [`init`] or
//! lazily from the environment on the first call to [`logger`]. Independent
//! loggers can still be built with [`Logger::builder`] alongside it.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_context::FieldValue,
    log_level::LogLevel,
    logger::Logger,
    metrics::CounterBank,
};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger built from `config`.
///
/// # Errors
///
/// [`LoggerError::AlreadyInitialized`] if a global logger already exists,
/// including one created lazily by [`logger`]; any build error otherwise.
pub fn init(config: LoggerConfig) -> Result<&'static Logger> {
    if GLOBAL.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let logger = Logger::new(config)?;
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        logger
    });
    if installed {
        Ok(global)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// The process-wide logger.
///
/// On first use without [`init`], the configuration is read with
/// [`LoggerConfig::from_env`]. A missing or invalid configuration at that
/// point is fatal: the failure is printed to stderr and the process exits
/// with status 1.
pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(|| {
        match LoggerConfig::from_env().and_then(Logger::new) {
            Ok(logger) => logger,
            Err(e) => fatal_startup("failed to create logger", &e),
        }
    })
}

/// Whether the process-wide logger exists yet.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Structured `info` record on the process-wide logger.
#[track_caller]
pub fn infow<I, K, V>(message: impl fmt::Display, pairs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    logger().infow(message, pairs);
}

/// Flush the process-wide logger, if it has been created.
pub fn sync() -> Result<()> {
    match GLOBAL.get() {
        Some(logger) => logger.sync(),
        None => Ok(()),
    }
}

/// A standalone production logger for a node rooted at `dir`.
///
/// See [`LoggerConfig::for_node`]. Failing to open a destination is fatal.
pub fn production_logger(
    dir: impl AsRef<Path>,
    json_console: bool,
    level: LogLevel,
    to_disk: bool,
) -> Logger {
    match Logger::new(LoggerConfig::for_node(dir, json_console, level, to_disk)) {
        Ok(logger) => logger,
        Err(e) => fatal_startup("failed to create logger", &e),
    }
}

/// Abort start-up: count a fatal line, report on stderr and exit with 1.
///
/// Used where no logger exists yet to carry the failure.
pub(crate) fn fatal_startup(context: &str, err: &dyn fmt::Display) -> ! {
    CounterBank::global().increment(LogLevel::Fatal);
    eprintln!("{context}: {err}");
    std::process::exit(1)
}
