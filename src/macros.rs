//! Logging macros for formatted and structured records.
//!
//! The `*f!` macros take `format!`-style arguments; the `*w!` macros take a
//! message followed by `key => value` pairs. Both forward to the matching
//! [`Logger`](crate::Logger) method, so the recorded caller is the macro's
//! call site.
//!
//! # Examples
//!
//! ```
//! use node_logger::prelude::*;
//! use node_logger::{infof, infow};
//!
//! let logger = Logger::new(LoggerConfig::production())?;
//!
//! let port = 8080;
//! infof!(logger, "Server listening on port {}", port);
//! infow!(logger, "peer connected", "addr" => "10.0.0.7:4000", "inbound" => true);
//! # Ok::<(), node_logger::LoggerError>(())
//! ```

/// Log a formatted debug-level message.
///
/// # Examples
///
/// ```
/// # use node_logger::prelude::*;
/// # let logger = Logger::new(LoggerConfig::production())?;
/// use node_logger::debugf;
/// debugf!(logger, "Counter value: {}", 10);
/// # Ok::<(), node_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted info-level message.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

/// Log a formatted warning-level message.
///
/// # Examples
///
/// ```
/// # use node_logger::prelude::*;
/// # let logger = Logger::new(LoggerConfig::production())?;
/// use node_logger::warnf;
/// warnf!(logger, "Retry attempt {} of {}", 3, 5);
/// # Ok::<(), node_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted error-level message.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted panic-level message, then panic.
#[macro_export]
macro_rules! panicf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted fatal-level message, then run the fatal hook.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}

/// Log a structured debug-level record.
#[macro_export]
macro_rules! debugw {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger.debugw($msg, $crate::__fields!($($key => $value),*))
    };
}

/// Log a structured info-level record.
///
/// Values may have different types; each is converted to a
/// [`FieldValue`](crate::FieldValue).
///
/// # Examples
///
/// ```
/// # use node_logger::prelude::*;
/// # let logger = Logger::new(LoggerConfig::production())?;
/// use node_logger::infow;
/// infow!(logger, "block imported", "height" => 1024u64, "hash" => "0xab12");
/// # Ok::<(), node_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! infow {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger.infow($msg, $crate::__fields!($($key => $value),*))
    };
}

/// Log a structured warning-level record.
#[macro_export]
macro_rules! warnw {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger.warnw($msg, $crate::__fields!($($key => $value),*))
    };
}

/// Log a structured error-level record.
#[macro_export]
macro_rules! errorw {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger.errorw($msg, $crate::__fields!($($key => $value),*))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __fields {
    ($($key:expr => $value:expr),*) => {{
        let fields: ::std::vec::Vec<(::std::string::String, $crate::FieldValue)> = ::std::vec![$((
            ::std::string::String::from($key),
            $crate::FieldValue::from($value),
        )),*];
        fields
    }};
}

/// Wrap a function path in a [`NamedFn`](crate::NamedFn) named after the path
/// as written.
///
/// # Examples
///
/// ```
/// use node_logger::named_fn;
///
/// fn close_db() -> Result<(), std::io::Error> {
///     Ok(())
/// }
///
/// assert_eq!(named_fn!(close_db).name(), "close_db");
/// ```
#[macro_export]
macro_rules! named_fn {
    ($path:path) => {
        $crate::NamedFn::new(::std::stringify!($path), $path)
    };
}
