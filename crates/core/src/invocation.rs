//! What a command body sees when it runs.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::result::ResultCode;
use crate::value::Arguments;

/// A command body.
///
/// Errors returned by the body are reported as
/// [`ResultCode::Terminated`]; they never reach the caller.
pub type CommandBody = Arc<dyn Fn(&Invocation) -> anyhow::Result<ResultCode> + Send + Sync>;

/// Cooperative cancellation flag shared between a handle and its body.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Write-only text sink.
pub trait OutputSink: Send + Sync {
    /// Write text as-is.
    fn write_str(&self, text: &str);

    /// Write text followed by a newline.
    fn write_line(&self, line: &str) {
        self.write_str(line);
        self.write_str("\n");
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_str(&self, _text: &str) {}
}

/// Arguments plus the environment of one invocation.
#[derive(Clone)]
pub struct Invocation {
    arguments: Arguments,
    cancel: CancelToken,
    out: Arc<dyn OutputSink>,
    err: Arc<dyn OutputSink>,
}

impl Invocation {
    /// An invocation writing to [`NullSink`]s.
    pub fn new(arguments: Arguments) -> Self {
        Invocation {
            arguments,
            cancel: CancelToken::new(),
            out: Arc::new(NullSink),
            err: Arc::new(NullSink),
        }
    }

    /// Replace the output and error sinks.
    pub fn with_sinks(mut self, out: Arc<dyn OutputSink>, err: Arc<dyn OutputSink>) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    /// Replace the cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The reified arguments.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Cancellation token; long-running bodies should poll it.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Shorthand for `cancel_token().is_cancelled()`.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Output sink.
    pub fn out(&self) -> &dyn OutputSink {
        self.out.as_ref()
    }

    /// Error sink.
    pub fn err(&self) -> &dyn OutputSink {
        self.err.as_ref()
    }
}

impl Deref for Invocation {
    type Target = Arguments;

    fn deref(&self) -> &Arguments {
        &self.arguments
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("arguments", &self.arguments)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
