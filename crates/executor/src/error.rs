//! Error types for dispatcher setup and execution handles.
//!
//! Resolution failures ([`verba_core::Error`]) never appear here: the
//! dispatcher reports them as [`ResultCode::Invalid`](verba_core::ResultCode)
//! and writes the message to the error sink.
//!
//! # Categories
//!
//! | Type | Raised by | Meaning |
//! |------|-----------|---------|
//! | `ExecutionError` | `Execution`, `WorkerPool` | Waiting failed, or work was not accepted |
//! | `BuildError` | `DispatcherBuilder::build` | A command or registry is unusable |
//! | `ConfigError` | `DispatcherConfig` | `verba.toml` could not be read, parsed or written |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use verba_core::{DescriptorError, PathError};
use verba_handlers::RegistryError;

/// Failure observing or scheduling an execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The execution was cancelled before producing a result
    #[error("execution was cancelled")]
    Cancelled,

    /// The caller stopped waiting; the work itself keeps running
    #[error("no result after {waited:?}")]
    Timeout {
        /// How long the caller waited
        waited: Duration,
    },

    /// The worker pool did not accept the work
    #[error("execution rejected: {reason}")]
    Rejected {
        /// Why the pool refused
        reason: String,
    },
}

/// A dispatcher could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A command path is malformed
    #[error("invalid command path '{path}': {source}")]
    Path {
        /// The path as written
        path: String,
        /// Parse failure
        source: PathError,
    },

    /// A command's parameter list is malformed
    #[error("invalid command '{path}': {source}")]
    Descriptor {
        /// The command's path
        path: String,
        /// Invariant violation
        source: DescriptorError,
    },

    /// A command references a type no handler accepts, or a registry
    /// rejected a registration
    #[error("invalid command '{path}': {source}")]
    Registry {
        /// The command's path, empty for registry-level failures
        path: String,
        /// Registry failure
        source: RegistryError,
    },

    /// The configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// `verba.toml` handling failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("failed to access config file '{}': {message}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// OS error text
        message: String,
    },

    /// The file content is not valid configuration
    #[error("failed to parse config file '{}': {message}", .path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser error text
        message: String,
    },

    /// The configuration could not be serialized
    #[error("failed to serialize config: {message}")]
    Serialize {
        /// Serializer error text
        message: String,
    },

    /// A field holds an unusable value
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
