//! The CommandDispatcher - single entry point from raw input to a result.
//!
//! Input flows tokenize → dispatch → reify → execute. Every failure before
//! the body runs is written to the error sink and reported as
//! [`ResultCode::Invalid`]; the body is never invoked for such input.
//!
//! # Thread Safety
//!
//! A built dispatcher is `Send + Sync`. Its trie and registries are frozen
//! at build time, so any number of threads may resolve and execute
//! concurrently.
//!
//! # Example
//!
//! ```ignore
//! use verba::{CommandDispatcher, ExecutableDescriptor, ParameterDescriptor, ResultCode, TypeSignature};
//!
//! let dispatcher = CommandDispatcher::builder()
//!     .define(
//!         "greet|hello",
//!         ExecutableDescriptor::builder(|inv| {
//!             inv.out().write_line(&format!("hello {}", inv.get::<String>(0)?));
//!             Ok(ResultCode::Success)
//!         })
//!         .param(ParameterDescriptor::new("name", TypeSignature::string())),
//!     )
//!     .build()?;
//!
//! assert_eq!(dispatcher.execute_sync("greet world"), ResultCode::Success);
//! ```

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;
use verba_core::{
    tokenize, DescriptorError, Error, ExecutableBuilder, ExecutableDescriptor, Invocation,
    ResultCode, Token, TypeSignature, Value, ValueType,
};
use verba_engine::{CommandPath, Reifier, Resolution, SyntaxTrie};
use verba_handlers::{
    ensure_supported, ArgumentHandler, HandlerRegistry, ImplicitRegistry, RegistryError, Supplier,
};

use crate::config::DispatcherConfig;
use crate::error::BuildError;
use crate::execution::{run_body, Execution};
use crate::pool::{PoolStats, WorkerPool};
use crate::sink::Sinks;

/// Resolves text input to commands and runs them.
pub struct CommandDispatcher {
    trie: SyntaxTrie,
    handlers: Arc<HandlerRegistry>,
    implicits: Arc<ImplicitRegistry>,
    pool: Arc<WorkerPool>,
    sinks: Sinks,
    config: DispatcherConfig,
}

impl CommandDispatcher {
    /// Start a builder with default configuration.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Tokenize and dispatch `input` without running anything.
    pub fn resolve(&self, input: &str) -> verba_core::Result<Resolution> {
        let tokens = tokenize(input)?;
        self.resolve_tokens(tokens)
    }

    /// Dispatch already tokenized input.
    pub fn resolve_tokens(&self, tokens: Vec<Token>) -> verba_core::Result<Resolution> {
        let reifier = Reifier::new(self.handlers.as_ref(), self.implicits.as_ref());
        self.trie.dispatch(tokens, &reifier)
    }

    /// Run the command named by `input` on the calling thread.
    pub fn execute_sync(&self, input: &str) -> ResultCode {
        match self.prepare(input) {
            Some((resolution, invocation)) => {
                run_body(Uuid::new_v4(), resolution.executable.body(), &invocation)
            }
            None => ResultCode::Invalid,
        }
    }

    /// Queue the command named by `input` on the worker pool.
    ///
    /// Invalid input yields an already completed handle.
    pub fn execute_async(&self, input: &str) -> Execution {
        let Some((resolution, invocation)) = self.prepare(input) else {
            return Execution::completed(ResultCode::Invalid);
        };
        let body = Arc::clone(resolution.executable.body());
        match Execution::submit(&self.pool, body, invocation) {
            Ok(execution) => execution,
            Err(e) => {
                warn!(target: "verba::exec", error = %e, "Execution not scheduled");
                self.sinks.err.write_line(&e.to_string());
                Execution::completed(ResultCode::Terminated)
            }
        }
    }

    /// Write the usage line of every command to the output sink.
    pub fn help(&self) {
        for line in self.usages() {
            self.sinks.out.write_line(&line);
        }
    }

    /// Usage line of every command, in registration order.
    pub fn usages(&self) -> Vec<String> {
        self.trie.usages(self.handlers.as_ref())
    }

    /// The command trie.
    pub fn trie(&self) -> &SyntaxTrie {
        &self.trie
    }

    /// The handler registry used for parsing.
    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    /// The implicit supplier registry.
    pub fn implicits(&self) -> &Arc<ImplicitRegistry> {
        &self.implicits
    }

    /// The worker pool behind [`execute_async`](Self::execute_async).
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Pool metrics.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Finish queued executions and stop the worker pool.
    ///
    /// A shared pool is shut down for every dispatcher using it.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    fn prepare(&self, input: &str) -> Option<(Resolution, Invocation)> {
        let tokens = match tokenize(input) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.report(&[], e.into());
                return None;
            }
        };
        let probe = self.config.print_usage_on_error.then(|| tokens.clone());

        match self.resolve_tokens(tokens) {
            Ok(resolution) => {
                let invocation = Invocation::new(resolution.arguments.clone())
                    .with_sinks(Arc::clone(&self.sinks.out), Arc::clone(&self.sinks.err));
                Some((resolution, invocation))
            }
            Err(e) => {
                self.report(probe.as_deref().unwrap_or(&[]), e);
                None
            }
        }
    }

    fn report(&self, tokens: &[Token], err: Error) {
        debug!(target: "verba::dispatch", error = %err, "Input rejected");
        let err = match err {
            Error::UnknownCommand { command, .. } if !self.config.suggest_commands => {
                Error::unknown_command(command)
            }
            other => other,
        };
        self.sinks.err.write_line(&err.to_string());

        if self.config.print_usage_on_error && err.is_argument_count() {
            if let Some(node) = self.trie.locate(tokens) {
                for line in self.trie.usages_at(node, self.handlers.as_ref()) {
                    self.sinks.err.write_line(&format!("usage: {}", line));
                }
            }
        }
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands", &self.trie.commands().len())
            .field("handlers", &self.handlers)
            .field("implicits", &self.implicits)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`CommandDispatcher`].
///
/// Registration problems are collected and reported by
/// [`build`](Self::build), so chains never need intermediate `?`.
#[derive(Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    base_handlers: Option<Arc<HandlerRegistry>>,
    extra_handlers: Vec<(ValueType, Arc<dyn ArgumentHandler>)>,
    base_implicits: Option<Arc<ImplicitRegistry>>,
    extra_implicits: Vec<(TypeSignature, Supplier)>,
    pool: Option<Arc<WorkerPool>>,
    sinks: Sinks,
    commands: Vec<(String, Result<ExecutableDescriptor, DescriptorError>)>,
}

impl DispatcherBuilder {
    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve handlers through `registry` instead of the shared defaults.
    pub fn handlers(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.base_handlers = Some(registry);
        self
    }

    /// Add a handler in a fork of the handler registry.
    pub fn handler(mut self, ty: ValueType, handler: Arc<dyn ArgumentHandler>) -> Self {
        self.extra_handlers.push((ty, handler));
        self
    }

    /// Resolve implicit values through `registry`.
    pub fn implicits(mut self, registry: Arc<ImplicitRegistry>) -> Self {
        self.base_implicits = Some(registry);
        self
    }

    /// Add an implicit supplier in a fork of the implicit registry.
    pub fn implicit<F>(mut self, signature: TypeSignature, supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.extra_implicits.push((signature, Arc::new(supplier)));
        self
    }

    /// Run asynchronous executions on `pool`, which may be shared.
    pub fn pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Write output and diagnostics to `sinks`.
    pub fn sinks(mut self, sinks: Sinks) -> Self {
        self.sinks = sinks;
        self
    }

    /// Register `executable` under `path`, e.g. `"run strings|str"`.
    pub fn command(mut self, path: impl Into<String>, executable: ExecutableDescriptor) -> Self {
        self.commands.push((path.into(), Ok(executable)));
        self
    }

    /// Build `builder` and register the result under `path`.
    pub fn define(mut self, path: impl Into<String>, builder: ExecutableBuilder) -> Self {
        self.commands.push((path.into(), builder.build()));
        self
    }

    /// Validate every registration and assemble the dispatcher.
    pub fn build(self) -> Result<CommandDispatcher, BuildError> {
        self.config.validate()?;

        let base = self.base_handlers.unwrap_or_else(HandlerRegistry::defaults);
        let handlers = if self.extra_handlers.is_empty() {
            base
        } else {
            let mut fork = base.fork();
            for (ty, handler) in self.extra_handlers {
                if !fork.register(ty.clone(), handler) {
                    return Err(BuildError::Registry {
                        path: String::new(),
                        source: RegistryError::DuplicateHandler { ty: ty.to_string() },
                    });
                }
            }
            Arc::new(fork)
        };

        let base = self.base_implicits.unwrap_or_default();
        let implicits = if self.extra_implicits.is_empty() {
            base
        } else {
            let mut fork = base.fork();
            for (signature, supplier) in self.extra_implicits {
                fork.try_register(signature, move || supplier())
                    .map_err(|source| BuildError::Registry {
                        path: String::new(),
                        source,
                    })?;
            }
            Arc::new(fork)
        };

        let mut trie = SyntaxTrie::new();
        for (text, executable) in self.commands {
            let path = CommandPath::parse(&text).map_err(|source| BuildError::Path {
                path: text.clone(),
                source,
            })?;
            let executable = executable.map_err(|source| BuildError::Descriptor {
                path: text.clone(),
                source,
            })?;
            for param in executable.params().iter().filter(|p| !p.is_implicit()) {
                ensure_supported(handlers.as_ref(), param.label(), param.signature()).map_err(
                    |source| BuildError::Registry {
                        path: text.clone(),
                        source,
                    },
                )?;
            }
            trie.register(path, Arc::new(executable));
        }

        let pool = self
            .pool
            .unwrap_or_else(|| Arc::new(WorkerPool::from_config(&self.config)));

        debug!(
            target: "verba::registry",
            commands = trie.commands().len(),
            "Dispatcher built"
        );
        Ok(CommandDispatcher {
            trie,
            handlers,
            implicits,
            pool,
            sinks: self.sinks,
            config: self.config,
        })
    }
}
