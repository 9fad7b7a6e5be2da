//! Scheme-addressed sink registry
//!
//! Destinations are named by URI (`scheme://selector`). A registry maps each
//! scheme to a factory that opens the destination when a configuration that
//! references it is built. Registration is append-only: a scheme can be
//! registered once and never removed.

use super::error::{LoggerError, Result};
use super::sink::{validate_scheme, Destination, SinkUri};
use crate::sinks::{ConsoleSink, FileSink, PrettyConsole};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Opens a destination for a URI with the factory's scheme.
pub type SinkFactory = Arc<dyn Fn(&SinkUri) -> Result<Arc<dyn Destination>> + Send + Sync>;

/// Scheme under which the pretty console renderer is registered.
pub const PRETTY_SCHEME: &str = "pretty";

static GLOBAL: OnceLock<SinkRegistry> = OnceLock::new();

pub struct SinkRegistry {
    factories: RwLock<HashMap<String, SinkFactory>>,
}

impl SinkRegistry {
    /// A registry with the built-in `file` and `console` schemes.
    pub fn new() -> Self {
        let registry = Self::empty();
        let mut factories = registry.factories.write();
        factories.insert("file".to_string(), Arc::new(open_file) as SinkFactory);
        factories.insert("console".to_string(), Arc::new(open_console) as SinkFactory);
        drop(factories);
        registry
    }

    /// A registry with no schemes at all.
    pub fn empty() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Built-ins plus `pretty` and the platform sinks.
    ///
    /// `pretty://stdout` renders to stdout; `pretty://console` and
    /// `pretty://stderr` render to stderr.
    pub fn with_defaults() -> Result<Self> {
        let registry = Self::new();
        registry.register(PRETTY_SCHEME, open_pretty)?;
        register_os_sinks(&registry)?;
        Ok(registry)
    }

    /// The process-wide registry.
    ///
    /// Initialized on first use with [`SinkRegistry::with_defaults`]. If that
    /// fails the process exits: sink resolution would be ambiguous.
    pub fn global() -> &'static SinkRegistry {
        GLOBAL.get_or_init(|| match Self::with_defaults() {
            Ok(registry) => registry,
            Err(e) => crate::core::global::fatal_startup("failed to register sinks", &e),
        })
    }

    /// Register `factory` under `scheme`.
    ///
    /// # Errors
    ///
    /// `DuplicateSink` if the scheme is taken, `InvalidSinkUri` if the scheme
    /// is not a valid URI scheme.
    pub fn register<F>(&self, scheme: &str, factory: F) -> Result<()>
    where
        F: Fn(&SinkUri) -> Result<Arc<dyn Destination>> + Send + Sync + 'static,
    {
        validate_scheme(scheme).map_err(|message| LoggerError::invalid_uri(scheme, message))?;
        let scheme = scheme.to_ascii_lowercase();

        let mut factories = self.factories.write();
        if factories.contains_key(&scheme) {
            return Err(LoggerError::duplicate_sink(scheme));
        }
        factories.insert(scheme, Arc::new(factory));
        Ok(())
    }

    /// Resolve `uri` and open its destination.
    pub fn open(&self, uri: &str) -> Result<Arc<dyn Destination>> {
        let uri = SinkUri::parse(uri)?;
        let factory = self
            .factories
            .read()
            .get(uri.scheme())
            .cloned()
            .ok_or_else(|| LoggerError::unknown_sink(uri.scheme(), uri.as_str()))?;
        // The lock is released before calling out so factories may use the registry.
        factory(&uri)
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.factories
            .read()
            .contains_key(&scheme.to_ascii_lowercase())
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.factories.read().keys().cloned().collect();
        schemes.sort();
        schemes
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register a scheme in the process-wide registry.
pub fn register_global<F>(scheme: &str, factory: F) -> Result<()>
where
    F: Fn(&SinkUri) -> Result<Arc<dyn Destination>> + Send + Sync + 'static,
{
    SinkRegistry::global().register(scheme, factory)
}

/// Register platform-specific schemes.
///
/// Windows paths such as `C:\logs\node.jsonl` do not survive the
/// `scheme://selector` form, so `winfile:///C:/logs/node.jsonl` is provided.
#[cfg(windows)]
pub fn register_os_sinks(registry: &SinkRegistry) -> Result<()> {
    registry.register("winfile", |uri: &SinkUri| {
        let path = uri.selector().trim_start_matches('/');
        Ok(Arc::new(FileSink::open(path)?) as Arc<dyn Destination>)
    })
}

/// Register platform-specific schemes. None are needed here.
#[cfg(not(windows))]
pub fn register_os_sinks(_registry: &SinkRegistry) -> Result<()> {
    Ok(())
}

fn open_file(uri: &SinkUri) -> Result<Arc<dyn Destination>> {
    if uri.selector().is_empty() {
        return Err(LoggerError::invalid_uri(uri.as_str(), "missing file path"));
    }
    Ok(Arc::new(FileSink::open(uri.selector())?) as Arc<dyn Destination>)
}

fn console_stream(uri: &SinkUri) -> Result<ConsoleSink> {
    ConsoleSink::from_selector(uri.selector()).ok_or_else(|| {
        LoggerError::invalid_uri(
            uri.as_str(),
            format!("unknown console stream {:?}", uri.selector()),
        )
    })
}

fn open_console(uri: &SinkUri) -> Result<Arc<dyn Destination>> {
    Ok(Arc::new(console_stream(uri)?) as Arc<dyn Destination>)
}

fn pretty_console(uri: &SinkUri) -> Result<PrettyConsole<ConsoleSink>> {
    Ok(PrettyConsole::new(console_stream(uri)?))
}

fn open_pretty(uri: &SinkUri) -> Result<Arc<dyn Destination>> {
    Ok(Arc::new(pretty_console(uri)?) as Arc<dyn Destination>)
}
