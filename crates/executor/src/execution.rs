//! Execution handles.
//!
//! An [`Execution`] is either already finished (invalid input, synchronous
//! runs, rejected submissions) or backed by shared state that a worker
//! completes. Observers block on a condition variable; nothing polls.
//!
//! | State | `result()` | `cancel()` |
//! |-------|------------|------------|
//! | Pending | blocks | prevents the body from running, `true` |
//! | Running | blocks | signals the body's token, `true` |
//! | Completed | the code | `false` |
//! | Cancelled | `Err(Cancelled)` | `false` |

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, warn};
use uuid::Uuid;
use verba_core::{CancelToken, CommandBody, Invocation, ResultCode};

use crate::error::ExecutionError;
use crate::pool::WorkerPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Running,
    Completed(ResultCode),
    Cancelled,
}

struct Shared {
    state: Mutex<State>,
    done: Condvar,
    cancel: CancelToken,
}

impl Shared {
    /// Move Pending to Running. False if cancelled first.
    fn begin(&self) -> bool {
        let mut state = self.state.lock();
        if *state == State::Pending {
            *state = State::Running;
            true
        } else {
            false
        }
    }

    fn complete(&self, code: ResultCode) {
        let mut state = self.state.lock();
        if *state == State::Running {
            *state = State::Completed(code);
        }
        self.done.notify_all();
    }

    fn settled(state: State) -> Option<Result<ResultCode, ExecutionError>> {
        match state {
            State::Completed(code) => Some(Ok(code)),
            State::Cancelled => Some(Err(ExecutionError::Cancelled)),
            State::Pending | State::Running => None,
        }
    }
}

enum Inner {
    Ready(ResultCode),
    Shared(Arc<Shared>),
}

/// Handle to one command execution.
pub struct Execution {
    id: Uuid,
    inner: Inner,
}

impl Execution {
    /// A handle that is already complete.
    pub fn completed(code: ResultCode) -> Self {
        Execution {
            id: Uuid::new_v4(),
            inner: Inner::Ready(code),
        }
    }

    /// Queue `body` on `pool`.
    ///
    /// The invocation's cancel token is replaced by the handle's.
    pub(crate) fn submit(
        pool: &WorkerPool,
        body: CommandBody,
        invocation: Invocation,
    ) -> Result<Self, ExecutionError> {
        let id = Uuid::new_v4();
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending),
            done: Condvar::new(),
            cancel: CancelToken::new(),
        });
        let invocation = invocation.with_cancel(shared.cancel.clone());

        let worker_side = Arc::clone(&shared);
        pool.submit(move || {
            if !worker_side.begin() {
                debug!(target: "verba::exec", %id, "Skipped cancelled execution");
                return;
            }
            let code = run_body(id, &body, &invocation);
            worker_side.complete(code);
        })?;

        debug!(target: "verba::exec", %id, "Execution queued");
        Ok(Execution {
            id,
            inner: Inner::Shared(shared),
        })
    }

    /// Unique id, also recorded in log events for this execution.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Block until the execution settles.
    pub fn result(&self) -> Result<ResultCode, ExecutionError> {
        let shared = match &self.inner {
            Inner::Ready(code) => return Ok(*code),
            Inner::Shared(shared) => shared,
        };
        let mut state = shared.state.lock();
        loop {
            if let Some(settled) = Shared::settled(*state) {
                return settled;
            }
            shared.done.wait(&mut state);
        }
    }

    /// Block for at most `timeout`.
    ///
    /// A timeout leaves the execution running.
    pub fn result_timeout(&self, timeout: Duration) -> Result<ResultCode, ExecutionError> {
        let shared = match &self.inner {
            Inner::Ready(code) => return Ok(*code),
            Inner::Shared(shared) => shared,
        };
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.result(),
        };
        let mut state = shared.state.lock();
        loop {
            if let Some(settled) = Shared::settled(*state) {
                return settled;
            }
            if shared.done.wait_until(&mut state, deadline).timed_out() {
                return Shared::settled(*state)
                    .unwrap_or(Err(ExecutionError::Timeout { waited: timeout }));
            }
        }
    }

    /// Request cancellation.
    ///
    /// Returns whether the request took effect, which is never the case once
    /// the execution has completed. A running body observes the request
    /// through its cancel token.
    pub fn cancel(&self) -> bool {
        let shared = match &self.inner {
            Inner::Ready(_) => return false,
            Inner::Shared(shared) => shared,
        };
        let mut state = shared.state.lock();
        match *state {
            State::Pending | State::Running => {
                *state = State::Cancelled;
                shared.cancel.cancel();
                shared.done.notify_all();
                debug!(target: "verba::exec", id = %self.id, "Execution cancelled");
                true
            }
            State::Completed(_) | State::Cancelled => false,
        }
    }

    /// Whether the execution has settled, by completion or cancellation.
    pub fn is_completed(&self) -> bool {
        match &self.inner {
            Inner::Ready(_) => true,
            Inner::Shared(shared) => Shared::settled(*shared.state.lock()).is_some(),
        }
    }

    /// Whether [`cancel`](Self::cancel) took effect.
    pub fn is_cancelled(&self) -> bool {
        match &self.inner {
            Inner::Ready(_) => false,
            Inner::Shared(shared) => *shared.state.lock() == State::Cancelled,
        }
    }
}

impl std::fmt::Debug for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.inner {
            Inner::Ready(code) => State::Completed(*code),
            Inner::Shared(shared) => *shared.state.lock(),
        };
        f.debug_struct("Execution")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

/// Run a body on the current thread.
///
/// An error or panic from the body becomes [`ResultCode::Terminated`] and is
/// written to the invocation's error sink.
pub(crate) fn run_body(id: Uuid, body: &CommandBody, invocation: &Invocation) -> ResultCode {
    match catch_unwind(AssertUnwindSafe(|| body(invocation))) {
        Ok(Ok(code)) => {
            debug!(target: "verba::exec", %id, code = %code, "Execution finished");
            code
        }
        Ok(Err(e)) => {
            warn!(target: "verba::exec", %id, error = %e, "Command failed");
            invocation.err().write_line(&format!("command failed: {:#}", e));
            ResultCode::Terminated
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "(non-string panic)".to_string());
            error!(target: "verba::exec", %id, panic = %message, "Command panicked");
            invocation.err().write_line(&format!("command panicked: {}", message));
            ResultCode::Terminated
        }
    }
}
