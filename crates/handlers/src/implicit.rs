//! Implicit value suppliers
//!
//! Implicit parameters take no user input; their value comes from a
//! supplier registered under the parameter's full generic signature.
//! Composition mirrors [`HandlerRegistry`](crate::HandlerRegistry):
//! a fork checks its own suppliers, then its parent's.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use verba_core::{TypeSignature, Value};

use crate::error::{RegistryError, Result};

/// Produces the value for an implicit parameter, once per invocation.
pub type Supplier = Arc<dyn Fn() -> Value + Send + Sync>;

/// Source of implicit values.
pub trait ImplicitProvider: Send + Sync {
    /// Supplier for an exact signature.
    fn find(&self, signature: &TypeSignature) -> Option<Supplier>;
}

/// Registry of implicit value suppliers, optionally layered over a parent.
#[derive(Default)]
pub struct ImplicitRegistry {
    suppliers: FxHashMap<TypeSignature, Supplier>,
    parent: Option<Arc<ImplicitRegistry>>,
}

impl ImplicitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty child whose lookups fall back to `self`.
    pub fn fork(self: &Arc<Self>) -> ImplicitRegistry {
        ImplicitRegistry {
            suppliers: FxHashMap::default(),
            parent: Some(Arc::clone(self)),
        }
    }

    /// Register a supplier.
    ///
    /// Returns `false` when this level already has one for the signature.
    pub fn register<F>(&mut self, signature: TypeSignature, supplier: F) -> bool
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        if self.suppliers.contains_key(&signature) {
            warn!(target: "verba::registry", signature = %signature, "Duplicate implicit supplier rejected");
            return false;
        }
        debug!(target: "verba::registry", signature = %signature, "Implicit supplier registered");
        self.suppliers.insert(signature, Arc::new(supplier));
        true
    }

    /// Register a supplier, failing on a duplicate.
    pub fn try_register<F>(&mut self, signature: TypeSignature, supplier: F) -> Result<()>
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        let name = signature.to_string();
        if self.register(signature, supplier) {
            Ok(())
        } else {
            Err(RegistryError::DuplicateImplicit { signature: name })
        }
    }

    /// Whether this level has a supplier for the signature.
    pub fn contains(&self, signature: &TypeSignature) -> bool {
        self.suppliers.contains_key(signature)
    }

    /// Number of suppliers at this level.
    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    /// Whether this level has no suppliers.
    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

impl ImplicitProvider for ImplicitRegistry {
    fn find(&self, signature: &TypeSignature) -> Option<Supplier> {
        self.suppliers
            .get(signature)
            .cloned()
            .or_else(|| self.parent.as_ref().and_then(|p| p.find(signature)))
    }
}

impl std::fmt::Debug for ImplicitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.suppliers.keys().map(ToString::to_string).collect();
        keys.sort_unstable();
        f.debug_struct("ImplicitRegistry")
            .field("suppliers", &keys)
            .field("parent", &self.parent)
            .finish()
    }
}
