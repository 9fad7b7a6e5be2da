//! File destination

use crate::core::Destination;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file, creating it and its parent directories.
///
/// Output is buffered; [`Destination::sync`] flushes the buffer and asks the
/// OS to persist the data.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileSink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.writer.lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.flush()?;
        writer.get_ref().sync_data()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the file
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_appends_after_sync() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("log.jsonl");

        let sink = FileSink::open(&path)?;
        sink.write(b"{\"msg\":\"one\"}\n")?;
        sink.write(b"{\"msg\":\"two\"}\n")?;
        sink.sync()?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        assert_eq!(sink.path(), path.as_path());
        Ok(())
    }

    #[test]
    fn test_reopen_appends() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("log.jsonl");

        FileSink::open(&path)?.write(b"first\n")?;
        FileSink::open(&path)?.write(b"second\n")?;

        assert_eq!(fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }
}
