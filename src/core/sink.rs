//! Destination trait for log output

use super::error::{LoggerError, Result};
use std::fmt;
use std::io;

/// A writable output for encoded records.
///
/// Implementations are shared between every emitting thread, so `write`
/// takes `&self`; a destination over a non-thread-safe writer serializes
/// access internally.
pub trait Destination: Send + Sync {
    /// Write one or more encoded records, returning the bytes consumed.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;
    /// Flush buffered output to the underlying medium.
    fn sync(&self) -> io::Result<()>;
    fn name(&self) -> &str;
}

/// A destination address split into scheme and selector.
///
/// `pretty://console` has scheme `pretty` and selector `console`. Strings
/// without `://` are file paths, except `stdout` and `stderr` which name the
/// console streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SinkUri {
    raw: String,
    scheme: String,
    selector: String,
}

impl SinkUri {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LoggerError::invalid_uri(raw, "empty destination"));
        }

        let (scheme, selector) = match raw.split_once("://") {
            Some((scheme, selector)) => {
                validate_scheme(scheme).map_err(|message| LoggerError::invalid_uri(raw, message))?;
                (scheme.to_ascii_lowercase(), selector.to_string())
            }
            None if raw == "stdout" || raw == "stderr" => ("console".to_string(), raw.to_string()),
            None => ("file".to_string(), raw.to_string()),
        };

        Ok(Self {
            raw: raw.to_string(),
            scheme,
            selector,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Everything after `scheme://`
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SinkUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Schemes follow RFC 3986: a letter, then letters, digits, `+`, `-` or `.`.
pub(crate) fn validate_scheme(scheme: &str) -> std::result::Result<(), &'static str> {
    let mut chars = scheme.chars();
    match chars.next() {
        None => return Err("empty scheme"),
        Some(c) if !c.is_ascii_alphabetic() => return Err("scheme must start with a letter"),
        Some(_) => {}
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Ok(())
    } else {
        Err("scheme may only contain letters, digits, '+', '-' and '.'")
    }
}
