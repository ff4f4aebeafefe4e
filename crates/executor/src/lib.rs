//! Command execution for verba
//!
//! This crate wires the resolution engine to command bodies:
//! - [`CommandDispatcher`]: tokenize, dispatch and run text input
//! - [`WorkerPool`] / [`Execution`]: asynchronous runs with cancellation
//!   and timeouts
//! - [`Sinks`]: where command output and diagnostics go
//! - [`DispatcherConfig`]: `verba.toml` configuration
//!
//! ## Result codes
//!
//! | Code | Produced when |
//! |------|---------------|
//! | `SUCCESS` / `FAILURE` | Returned by the command body |
//! | `TERMINATED` | The body errored or panicked, or could not be scheduled |
//! | `INVALID` | Input did not resolve; the body never ran |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod execution;
pub mod pool;
pub mod sink;

pub use config::{DispatcherConfig, CONFIG_FILE_NAME};
pub use dispatcher::{CommandDispatcher, DispatcherBuilder};
pub use error::{BuildError, ConfigError, ExecutionError};
pub use execution::Execution;
pub use pool::{PoolStats, WorkerPool};
pub use sink::{BufferSink, Sinks, StderrSink, StdoutSink};
