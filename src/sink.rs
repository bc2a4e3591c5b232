use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Destination for formatted log lines.
///
/// Implementations are responsible for writing each line atomically: the
/// logger calls `write` once per record, possibly from many threads at once,
/// and lines must never interleave.
pub trait LogSink: Send + Sync {
    /// Write one complete, newline-terminated line.
    ///
    /// **Returns**
    /// - `Ok(())` if the line was accepted.
    /// - `Err(..)` if the underlying writer failed. The logger reports this
    ///   to the caller of `try_log` and drops the line.
    fn write(&self, line: &[u8]) -> io::Result<()>;

    /// Flush any buffered lines. Default implementation is a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink over any [`Write`] implementation, serialized by a mutex.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
        }
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        WriterSink::new(io::stderr())
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        WriterSink::new(io::stdout())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write(&self, line: &[u8]) -> io::Result<()> {
        self.writer.lock().write_all(line)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of the logger itself, and for tests
/// that only look at records captured by a hook.
#[derive(Clone, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write(&self, _line: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sink keeping every written byte. Clones share the buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Written lines, without their trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Written lines parsed as JSON objects. Lines that are not valid JSON
    /// are skipped.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &[u8]) -> io::Result<()> {
        self.buffer.lock().extend_from_slice(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_clones_share_lines() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.write(b"{\"a\":\"1\"}\n").unwrap();
        sink.write(b"not json\n").unwrap();

        assert_eq!(sink.lines(), vec!["{\"a\":\"1\"}", "not json"]);
        assert_eq!(sink.json_lines().len(), 1);

        sink.clear();
        assert!(clone.contents().is_empty());
    }

    #[test]
    fn writer_sink_writes_whole_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write(b"one\n").unwrap();
        sink.write(b"two\n").unwrap();
        assert_eq!(&*sink.writer.lock(), b"one\ntwo\n");
    }
}
