//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A sink factory is already registered under this scheme
    #[error("sink factory already registered for scheme {scheme:?}")]
    DuplicateSink { scheme: String },

    /// No sink factory is registered for the scheme of a destination URI
    #[error("no sink found for scheme {scheme:?} (destination {uri:?})")]
    UnknownSink { scheme: String, uri: String },

    /// A destination URI or scheme could not be understood
    #[error("invalid sink URI {uri:?}: {message}")]
    InvalidSinkUri { uri: String, message: String },

    /// Unrecognized level name
    #[error("unrecognized level: {value:?}")]
    InvalidLevel { value: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The process-wide logger was initialized twice
    #[error("global logger already initialized")]
    AlreadyInitialized,

    /// IO error, passed through unmodified
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create a duplicate sink error
    pub fn duplicate_sink(scheme: impl Into<String>) -> Self {
        LoggerError::DuplicateSink {
            scheme: scheme.into(),
        }
    }

    /// Create an unknown sink error
    pub fn unknown_sink(scheme: impl Into<String>, uri: impl Into<String>) -> Self {
        LoggerError::UnknownSink {
            scheme: scheme.into(),
            uri: uri.into(),
        }
    }

    /// Create an invalid sink URI error
    pub fn invalid_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidSinkUri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create an invalid level error
    pub fn invalid_level(value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            value: value.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
