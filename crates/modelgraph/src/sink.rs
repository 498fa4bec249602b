//! Line-oriented output sinks.
//!
//! Renderers and emitters never write to files directly; they receive an
//! [`OutputSink`] and write indented lines to it. [`with_file_sink`] scopes a
//! file-backed sink so it is closed on every exit path.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// Text written once per indentation level.
pub const INDENT: &str = "   ";

/// A destination for lines of generated text.
pub trait OutputSink {
    /// Writes `text` as one line, prefixed by `indent` indentation levels.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying destination fails or the sink
    /// has already been closed.
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()>;

    /// Flushes and releases the destination. Closing twice is a no-op.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An in-memory sink.
#[derive(Debug, Default)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text written so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl OutputSink for StringSink {
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()> {
        for _ in 0..indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }
}

/// A buffered, file-backed sink.
///
/// The file is flushed by [`close`](OutputSink::close). If the sink is dropped
/// without being closed, a best-effort flush is attempted and failures are
/// logged.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!(path = path.display().to_string(); "Opened output file");
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl OutputSink for FileSink {
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::other(format!("{} is closed", self.path.display())))?;
        for _ in 0..indent {
            writer.write_all(INDENT.as_bytes())?;
        }
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!(path = self.path.display().to_string(); "Closed output file");
        }
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(err) = writer.flush() {
                warn!(
                    path = self.path.display().to_string(), error:% = err;
                    "Failed to flush output file"
                );
            }
        }
    }
}

/// Runs `f` with a file sink for `path` and closes it afterwards.
///
/// The sink is closed whether `f` succeeds or fails. An error from `f` takes
/// precedence over an error from closing.
///
/// # Errors
///
/// Returns an error if the file cannot be created, if `f` fails, or if the
/// final flush fails.
///
/// # Examples
///
/// ```no_run
/// use modelgraph::sink::{OutputSink, with_file_sink};
///
/// with_file_sink("out.txt", |sink| sink.write_line(0, "hello"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn with_file_sink<T, E, F>(path: impl AsRef<Path>, f: F) -> Result<T, E>
where
    E: From<io::Error>,
    F: FnOnce(&mut FileSink) -> Result<T, E>,
{
    let mut sink = FileSink::create(path)?;
    let result = f(&mut sink);
    let closed = sink.close();
    let value = result?;
    closed?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_string_sink_indents() {
        let mut sink = StringSink::new();
        sink.write_line(0, "root").unwrap();
        sink.write_line(2, "child").unwrap();

        assert_eq!(sink.as_str(), "root\n      child\n");
    }

    #[test]
    fn test_with_file_sink_writes_and_closes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        with_file_sink(&path, |sink| {
            sink.write_line(0, "first")?;
            sink.write_line(1, "second")
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n   second\n");
    }

    #[test]
    fn test_with_file_sink_closes_on_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.txt");

        let result: Result<(), io::Error> = with_file_sink(&path, |sink| {
            sink.write_line(0, "written")?;
            Err(io::Error::other("handler failed"))
        });

        assert_eq!(result.unwrap_err().to_string(), "handler failed");
        // Content written before the failure is flushed
        assert_eq!(fs::read_to_string(&path).unwrap(), "written\n");
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut sink = FileSink::create(dir.path().join("closed.txt")).unwrap();

        sink.close().unwrap();
        assert!(sink.is_closed());
        assert!(sink.write_line(0, "late").is_err());
        // Closing again is a no-op
        sink.close().unwrap();
    }
}
