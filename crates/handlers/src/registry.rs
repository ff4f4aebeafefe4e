//! Argument handler registry
//!
//! Maps a [`ValueType`] key to the handler that parses it.
//!
//! ## Lookup
//!
//! 1. The exact key
//! 2. Each ancestor of the requested type, nearest first
//! 3. The same two steps in the parent registry, if this one is a fork
//!
//! A registry never holds two handlers for the same key. A fork may shadow
//! a parent's key; registering into a fork never touches the parent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let base = HandlerRegistry::defaults();
//! let mut registry = base.fork();
//! registry.register(ValueType::String, Arc::new(PathHandler));
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use verba_core::ValueType;

use crate::builtin;
use crate::error::{RegistryError, Result};
use crate::handler::{ArgumentHandler, HandlerLookup};

static DEFAULTS: Lazy<Arc<HandlerRegistry>> = Lazy::new(|| Arc::new(HandlerRegistry::with_defaults()));

/// Registry of argument handlers, optionally layered over a parent.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<ValueType, Arc<dyn ArgumentHandler>>,
    parent: Option<Arc<HandlerRegistry>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::install(&mut registry);
        registry
    }

    /// The shared, process-wide registry of built-in handlers.
    pub fn defaults() -> Arc<HandlerRegistry> {
        Arc::clone(&DEFAULTS)
    }

    /// Start a builder that reports duplicate keys as errors.
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder {
            registry: Self::new(),
            error: None,
        }
    }

    /// Create an empty child whose lookups fall back to `self`.
    pub fn fork(self: &Arc<Self>) -> HandlerRegistry {
        HandlerRegistry {
            handlers: FxHashMap::default(),
            parent: Some(Arc::clone(self)),
        }
    }

    /// Register a handler.
    ///
    /// Returns `false`, leaving the registry unchanged, when this level
    /// already holds a handler for the exact key.
    pub fn register(&mut self, ty: ValueType, handler: Arc<dyn ArgumentHandler>) -> bool {
        if self.handlers.contains_key(&ty) {
            warn!(target: "verba::registry", ty = %ty, "Duplicate handler rejected");
            return false;
        }
        debug!(target: "verba::registry", ty = %ty, "Handler registered");
        self.handlers.insert(ty, handler);
        true
    }

    /// Whether this level holds a handler for the exact key.
    pub fn contains(&self, ty: &ValueType) -> bool {
        self.handlers.contains_key(ty)
    }

    /// Number of handlers at this level.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether this level holds no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Parent registry, if this is a fork.
    pub fn parent(&self) -> Option<&Arc<HandlerRegistry>> {
        self.parent.as_ref()
    }

    fn find_local(&self, ty: &ValueType) -> Option<Arc<dyn ArgumentHandler>> {
        if let Some(handler) = self.handlers.get(ty) {
            return Some(Arc::clone(handler));
        }
        ty.ancestors()
            .find_map(|ancestor| self.handlers.get(&ancestor).cloned())
    }
}

impl HandlerLookup for HandlerRegistry {
    fn find_handler(&self, ty: &ValueType) -> Option<Arc<dyn ArgumentHandler>> {
        self.find_local(ty)
            .or_else(|| self.parent.as_ref().and_then(|p| p.find_handler(ty)))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.handlers.keys().map(ValueType::name).collect();
        keys.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &keys)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Builder for [`HandlerRegistry`].
pub struct HandlerRegistryBuilder {
    registry: HandlerRegistry,
    error: Option<RegistryError>,
}

impl HandlerRegistryBuilder {
    /// Layer the registry being built over `parent`.
    pub fn parent(mut self, parent: Arc<HandlerRegistry>) -> Self {
        self.registry.parent = Some(parent);
        self
    }

    /// Add every built-in handler.
    pub fn builtins(mut self) -> Self {
        builtin::install(&mut self.registry);
        self
    }

    /// Add a handler. A duplicate key fails the build.
    pub fn handler(mut self, ty: ValueType, handler: Arc<dyn ArgumentHandler>) -> Self {
        if self.error.is_none() && !self.registry.register(ty.clone(), handler) {
            self.error = Some(RegistryError::DuplicateHandler {
                ty: ty.to_string(),
            });
        }
        self
    }

    /// Finish, reporting the first rejected registration.
    pub fn build(self) -> Result<HandlerRegistry> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.registry),
        }
    }
}
