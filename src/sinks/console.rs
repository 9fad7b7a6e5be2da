//! Standard stream destinations

use crate::core::Destination;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes records to stdout or stderr.
///
/// The standard streams lock internally, so concurrent writers never
/// interleave within a single record.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    stream: Stream,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }

    /// Stream named by a URI selector: `stdout`, or `stderr` / `console` /
    /// empty for stderr.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "stdout" => Some(Self::stdout()),
            "stderr" | "console" | "" => Some(Self::stderr()),
            _ => None,
        }
    }
}

impl Write for ConsoleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Destination::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Destination::sync(self)
    }
}

impl Destination for ConsoleSink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(buf)?,
            Stream::Stderr => io::stderr().lock().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}
