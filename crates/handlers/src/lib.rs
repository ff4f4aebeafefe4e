//! Argument handlers for verba
//!
//! - [`ArgumentHandler`]: parses one literal into a typed value
//! - [`HandlerRegistry`]: type-keyed handler lookup with ancestor fallback
//!   and forked composition
//! - [`ImplicitRegistry`]: suppliers for implicit parameters
//! - [`builtin`]: scalar, numeric, enum and composite handlers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod error;
pub mod handler;
pub mod implicit;
pub mod registry;

pub use error::{RegistryError, Result};
pub use handler::{describe, ensure_supported, parse_value, ArgumentHandler, HandlerLookup};
pub use implicit::{ImplicitProvider, ImplicitRegistry, Supplier};
pub use registry::{HandlerRegistry, HandlerRegistryBuilder};
