//! In-memory destination

use crate::core::Destination;
use parking_lot::Mutex;
use std::io::{self, ErrorKind};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    buf: Vec<u8>,
    write_error: Option<(ErrorKind, String)>,
    sync_error: Option<(ErrorKind, String)>,
}

/// A shared byte buffer.
///
/// Clones share the same buffer, so a test can keep one handle and hand
/// another to a logger. Writes and syncs can be made to fail to exercise
/// error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `write` fails with the given error.
    pub fn failing_write(kind: ErrorKind, message: impl Into<String>) -> Self {
        let sink = Self::new();
        sink.inner.lock().write_error = Some((kind, message.into()));
        sink
    }

    /// A sink whose every `sync` fails with the given error.
    pub fn failing_sync(kind: ErrorKind, message: impl Into<String>) -> Self {
        let sink = Self::new();
        sink.inner.lock().sync_error = Some((kind, message.into()));
        sink
    }

    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().buf.clone()
    }

    /// Contents decoded lossily as UTF-8
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().buf).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().buf.is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().buf.clear();
    }
}

impl Destination for MemorySink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        if let Some((kind, ref message)) = inner.write_error {
            return Err(io::Error::new(kind, message.clone()));
        }
        inner.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        match self.inner.lock().sync_error {
            Some((kind, ref message)) => Err(io::Error::new(kind, message.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl io::Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Destination::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Destination::sync(self)
    }
}
