//! Logger facade
//!
//! [`Logger`] is the emission API used at call sites. It wraps a shared
//! [`Core`] and adds:
//!
//! - per-level line counting (every call counts, filtered or not)
//! - `*_if` helpers that log an error result and carry on
//! - panic and fatal escalation
//! - derived loggers carrying extra fields or a trace id
//!
//! Loggers are cheap to clone; clones share the core and the counters.

use super::{
    config::LoggerConfig,
    encoder::JsonEncoder,
    engine::Core,
    error::{LoggerError, Result},
    log_context::{FieldValue, LogContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::CounterBank,
    registry::SinkRegistry,
    sink::Destination,
    span::{SpanContext, TRACE_ID_KEY},
    wrap::{wrap, BoxError, NamedFn},
};
use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

/// Called after a fatal record is written and synced, with the exit code.
pub type FatalHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit code passed to the fatal hook.
pub const FATAL_EXIT_CODE: i32 = 1;

#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    fields: LogContext,
    counters: Arc<CounterBank>,
    fatal_hook: FatalHook,
    development: bool,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use node_logger::prelude::*;
    ///
    /// let buffer = MemorySink::new();
    /// let config = LoggerConfig::production().with_output_paths(Vec::<String>::new());
    /// let logger = Logger::builder(config)
    ///     .destination(buffer.clone())
    ///     .counters(std::sync::Arc::new(CounterBank::new()))
    ///     .build()?;
    ///
    /// logger.infow("started", [("port", 8080)]);
    /// assert!(buffer.contents_string().contains("\"port\":8080"));
    /// # Ok::<(), node_logger::LoggerError>(())
    /// ```
    #[must_use]
    pub fn builder(config: LoggerConfig) -> LoggerBuilder<'static> {
        LoggerBuilder::new(config)
    }

    /// Build a logger from `config` using the global sink registry and counters.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Active level of the underlying core.
    pub fn level(&self) -> LogLevel {
        self.core.level()
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    /// Counters this logger increments.
    pub fn counters(&self) -> &Arc<CounterBank> {
        &self.counters
    }

    /// Fields attached to every record from this logger.
    pub fn fields(&self) -> &LogContext {
        &self.fields
    }

    // ------------------------------------------------------------------
    // Derived loggers
    // ------------------------------------------------------------------

    /// A logger that attaches `pairs` to every record. `self` is unchanged.
    #[must_use]
    pub fn with<I, K, V>(&self, pairs: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut derived = self.clone();
        derived.fields.merge(&LogContext::from_pairs(pairs));
        derived
    }

    /// A logger that tags records with the span's trace id under `TraceID`.
    ///
    /// Returns an unchanged clone when `span` is `None` or not valid.
    #[must_use]
    pub fn with_span(&self, span: Option<&SpanContext>) -> Logger {
        match span {
            Some(span) if span.is_valid() => self.with([(TRACE_ID_KEY, span.trace_id.as_str())]),
            _ => self.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Plain messages
    // ------------------------------------------------------------------

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Debug, message.to_string(), None);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, message.to_string(), None);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Warn, message.to_string(), None);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Error, message.to_string(), None);
    }

    /// Log at `dpanic`; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: impl fmt::Display) {
        let message = message.to_string();
        self.emit(LogLevel::DPanic, message.clone(), None);
        if self.development {
            panic!("{}", message);
        }
    }

    /// Log at `panic`, then panic with the same message.
    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> ! {
        let message = message.to_string();
        self.emit(LogLevel::Panic, message.clone(), None);
        panic!("{}", message);
    }

    /// Log at `fatal`, sync, then run the fatal hook.
    ///
    /// With the default hook the process exits with status 1 and this never
    /// returns. Nothing else runs: no destructors, no further logging.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Fatal, message.to_string(), None);
        self.terminate();
    }

    // ------------------------------------------------------------------
    // Structured messages
    // ------------------------------------------------------------------

    #[track_caller]
    pub fn debugw<I, K, V>(&self, message: impl fmt::Display, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.emit(LogLevel::Debug, message.to_string(), Some(LogContext::from_pairs(pairs)));
    }

    #[track_caller]
    pub fn infow<I, K, V>(&self, message: impl fmt::Display, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.emit(LogLevel::Info, message.to_string(), Some(LogContext::from_pairs(pairs)));
    }

    #[track_caller]
    pub fn warnw<I, K, V>(&self, message: impl fmt::Display, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.emit(LogLevel::Warn, message.to_string(), Some(LogContext::from_pairs(pairs)));
    }

    #[track_caller]
    pub fn errorw<I, K, V>(&self, message: impl fmt::Display, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.emit(LogLevel::Error, message.to_string(), Some(LogContext::from_pairs(pairs)));
    }

    /// Structured record from an implicitly paired sequence `k1, v1, k2, v2`.
    ///
    /// An odd trailing key is kept under `ignored`; see
    /// [`LogContext::from_loose`].
    #[track_caller]
    pub fn logw_loose(&self, level: LogLevel, message: impl fmt::Display, values: Vec<FieldValue>) {
        self.emit(level, message.to_string(), Some(LogContext::from_loose(values)));
    }

    // ------------------------------------------------------------------
    // Formatted messages, see the `infof!` family of macros
    // ------------------------------------------------------------------

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Debug, fmt::format(args), None);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Info, fmt::format(args), None);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Warn, fmt::format(args), None);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Error, fmt::format(args), None);
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.panic(fmt::format(args))
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.fatal(fmt::format(args));
    }

    // ------------------------------------------------------------------
    // Error helpers
    // ------------------------------------------------------------------

    /// Log `Err` at `warn` and return `None`; pass `Ok` through.
    #[track_caller]
    pub fn warn_if<T, E>(&self, result: std::result::Result<T, E>) -> Option<T>
    where
        E: Into<BoxError>,
    {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let e: BoxError = e.into();
                self.emit(LogLevel::Warn, e.to_string(), None);
                None
            }
        }
    }

    /// Log `Err` at `error`, wrapped with `context` if given, and return
    /// `None`; pass `Ok` through.
    #[track_caller]
    pub fn error_if<T, E>(
        &self,
        result: std::result::Result<T, E>,
        context: Option<&str>,
    ) -> Option<T>
    where
        E: Into<BoxError>,
    {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let message = match context {
                    Some(context) => wrap(e, context).to_string(),
                    None => {
                        let e: BoxError = e.into();
                        e.to_string()
                    }
                };
                self.emit(LogLevel::Error, message, None);
                None
            }
        }
    }

    /// Call `f` and log its failure at `error`.
    ///
    /// The error is wrapped with the function's name, then with `context` if
    /// given: `"<context>: <name>: <error>"`.
    #[track_caller]
    pub fn error_if_calling<F, E>(&self, f: NamedFn<F>, context: Option<&str>)
    where
        F: FnOnce() -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        if let Err(e) = f.call() {
            let message = match context {
                Some(context) => wrap(e, context).to_string(),
                None => e.to_string(),
            };
            self.emit(LogLevel::Error, message, None);
        }
    }

    /// Return the `Ok` value, or log the error at `panic` and panic.
    #[track_caller]
    pub fn panic_if<T, E>(&self, result: std::result::Result<T, E>) -> T
    where
        E: Into<BoxError>,
    {
        match result {
            Ok(value) => value,
            Err(e) => {
                let e: BoxError = e.into();
                self.panic(e)
            }
        }
    }

    /// Flush every destination. The first failure is returned unmodified.
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Count the call, then hand the record to the core.
    ///
    /// The counter is bumped before the level gate so it reflects every call
    /// site hit, including filtered ones.
    #[track_caller]
    fn emit(&self, level: LogLevel, message: String, context: Option<LogContext>) {
        self.emit_at(level, message, context, Some(Location::caller()));
    }

    fn emit_at(
        &self,
        level: LogLevel,
        message: String,
        context: Option<LogContext>,
        caller: Option<&Location<'_>>,
    ) {
        self.counters.increment(level);
        if !self.core.enabled(level) {
            return;
        }

        let mut fields = self.fields.clone();
        if let Some(ref context) = context {
            fields.merge(context);
        }

        let mut entry = LogEntry::new(level, message).with_context(fields);
        if let Some(caller) = caller.filter(|_| self.add_caller) {
            entry = entry.with_caller(caller);
        }
        if self.stacktrace_level.is_some_and(|min| level >= min) {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }
        self.core.write(&entry);
    }

    fn terminate(&self) {
        let _ = self.core.sync();
        (self.fatal_hook)(FATAL_EXIT_CODE);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("fields", &self.fields)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

/// Each write is logged at `info` as one record, trailing newline removed.
///
/// Lets a logger stand in wherever an `io::Write` is expected, for example
/// as the output of a library that prints progress lines. These records carry
/// no `caller`: the trait method cannot see past the writer that called it.
impl io::Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let message = text.trim_end_matches(['\r', '\n']).to_string();
        self.emit_at(LogLevel::Info, message, None, None);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync().map_err(|e| match e {
            LoggerError::Io(e) => e,
            other => io::Error::other(other.to_string()),
        })
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use node_logger::prelude::*;
/// use std::sync::Arc;
///
/// let registry = SinkRegistry::new();
/// let logger = Logger::builder(LoggerConfig::production().with_level(LogLevel::Debug))
///     .registry(&registry)
///     .counters(Arc::new(CounterBank::new()))
///     .fatal_hook(Arc::new(|code: i32| eprintln!("would exit with {code}")))
///     .build()?;
/// # Ok::<(), node_logger::LoggerError>(())
/// ```
pub struct LoggerBuilder<'a> {
    config: LoggerConfig,
    registry: Option<&'a SinkRegistry>,
    counters: Option<Arc<CounterBank>>,
    fatal_hook: Option<FatalHook>,
    destinations: Vec<Arc<dyn Destination>>,
    error_destinations: Vec<Arc<dyn Destination>>,
}

impl<'a> LoggerBuilder<'a> {
    /// Create a new builder around `config`
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            registry: None,
            counters: None,
            fatal_hook: None,
            destinations: Vec::new(),
            error_destinations: Vec::new(),
        }
    }

    /// Resolve destination URIs against `registry` instead of the global one.
    #[must_use = "builder methods return a new value"]
    pub fn registry<'b>(self, registry: &'b SinkRegistry) -> LoggerBuilder<'b> {
        LoggerBuilder {
            config: self.config,
            registry: Some(registry),
            counters: self.counters,
            fatal_hook: self.fatal_hook,
            destinations: self.destinations,
            error_destinations: self.error_destinations,
        }
    }

    /// Count into `counters` instead of the global bank.
    #[must_use = "builder methods return a new value"]
    pub fn counters(mut self, counters: Arc<CounterBank>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Replace the default fatal hook (`std::process::exit`).
    #[must_use = "builder methods return a new value"]
    pub fn fatal_hook(mut self, hook: FatalHook) -> Self {
        self.fatal_hook = Some(hook);
        self
    }

    /// Add an already-open output next to the configured ones.
    #[must_use = "builder methods return a new value"]
    pub fn destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.destinations.push(Arc::new(destination));
        self
    }

    /// Add an already-open error output next to the configured ones.
    #[must_use = "builder methods return a new value"]
    pub fn error_destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.error_destinations.push(Arc::new(destination));
        self
    }

    /// Resolve the destinations and build the Logger
    ///
    /// # Errors
    ///
    /// Any destination URI that does not resolve, or a configuration with no
    /// outputs at all.
    pub fn build(self) -> Result<Logger> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => SinkRegistry::global(),
        };
        let (mut outputs, mut error_outputs) = self.config.open_destinations(registry)?;
        outputs.extend(self.destinations);
        error_outputs.extend(self.error_destinations);

        if outputs.is_empty() {
            return Err(LoggerError::config("LoggerConfig", "no output destinations"));
        }

        let core = Core::new(
            self.config.level,
            JsonEncoder::new(self.config.timestamp_format),
            outputs,
            error_outputs,
        );

        Ok(Logger {
            core: Arc::new(core),
            fields: LogContext::new(),
            counters: self
                .counters
                .unwrap_or_else(|| Arc::clone(CounterBank::global())),
            fatal_hook: self
                .fatal_hook
                .unwrap_or_else(|| Arc::new(|code| std::process::exit(code))),
            development: self.config.development,
            add_caller: self.config.add_caller,
            stacktrace_level: self.config.stacktrace_level,
        })
    }
}
