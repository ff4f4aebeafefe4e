//! Output sinks.
//!
//! Bodies write through the [`OutputSink`] handles on their
//! [`Invocation`](verba_core::Invocation); the dispatcher writes resolution
//! errors and usage text to its error sink.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use verba_core::OutputSink;

/// Writes to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_str(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Writes to the process's standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn write_str(&self, text: &str) {
        let _ = std::io::stderr().lock().write_all(text.as_bytes());
    }
}

/// In-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<String>>,
}

impl BufferSink {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Written text split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lock().lines().map(str::to_string).collect()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Discard the contents.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl OutputSink for BufferSink {
    fn write_str(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }
}

/// The output and error sinks of a dispatcher.
#[derive(Clone)]
pub struct Sinks {
    /// Normal output.
    pub out: Arc<dyn OutputSink>,
    /// Diagnostics.
    pub err: Arc<dyn OutputSink>,
}

impl Sinks {
    /// Standard output and standard error.
    pub fn stdio() -> Self {
        Sinks {
            out: Arc::new(StdoutSink),
            err: Arc::new(StderrSink),
        }
    }

    /// Two fresh buffers, returned alongside for inspection.
    pub fn buffered() -> (Self, BufferSink, BufferSink) {
        let out = BufferSink::new();
        let err = BufferSink::new();
        let sinks = Sinks {
            out: Arc::new(out.clone()),
            err: Arc::new(err.clone()),
        };
        (sinks, out, err)
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self::stdio()
    }
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_clones_share_contents() {
        let sink = BufferSink::new();
        let clone = sink.clone();
        clone.write_line("one");
        clone.write_str("two");
        assert_eq!(sink.contents(), "one\ntwo");
        assert_eq!(sink.lines(), vec!["one", "two"]);
        sink.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_buffered_sinks_are_separate() {
        let (sinks, out, err) = Sinks::buffered();
        sinks.out.write_line("result");
        sinks.err.write_line("problem");
        assert_eq!(out.lines(), vec!["result"]);
        assert_eq!(err.lines(), vec!["problem"]);
    }
}
