//! Registration errors.

use thiserror::Error;

/// A registry rejected a registration, or a descriptor references a type
/// no registry can handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler for this exact type is already registered at this level
    #[error("a handler for '{ty}' is already registered")]
    DuplicateHandler {
        /// Type key
        ty: String,
    },

    /// A supplier for this exact signature is already registered at this level
    #[error("an implicit supplier for '{signature}' is already registered")]
    DuplicateImplicit {
        /// Full generic signature
        signature: String,
    },

    /// No handler accepts the type of a parameter
    #[error("no handler for type '{ty}' (parameter '{parameter}')")]
    MissingHandler {
        /// Type without a handler
        ty: String,
        /// Parameter, or nested element, that needs it
        parameter: String,
    },

    /// A composite type is missing a generic argument
    #[error("type '{ty}' of parameter '{parameter}' needs {expected} type argument(s)")]
    MissingTypeArgument {
        /// Composite type
        ty: String,
        /// Parameter that declared it
        parameter: String,
        /// Required argument count
        expected: usize,
    },
}

/// Result type for registration operations
pub type Result<T> = std::result::Result<T, RegistryError>;
