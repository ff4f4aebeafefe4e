//! The handler seam.
//!
//! An [`ArgumentHandler`] turns one literal into a [`Value`] for a
//! parameter. Composite handlers receive the [`HandlerLookup`] they were
//! found through, so element types resolve against the same (possibly
//! forked) registry as the outer parameter.

use std::sync::Arc;

use verba_core::{ArgumentParseError, ParameterDescriptor, TypeSignature, Value, ValueType};

use crate::error::RegistryError;

/// Parses literals for one or more value types.
pub trait ArgumentHandler: Send + Sync {
    /// Parse `literal` for `param`.
    ///
    /// `literal` has its top-level quotes already resolved.
    fn parse(
        &self,
        lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError>;

    /// Describe the accepted literal form, for usage lines.
    fn syntax(&self, lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String;
}

/// Resolves the handler for a type.
pub trait HandlerLookup: Send + Sync {
    /// Handler for `ty`, falling back along its ancestor chain.
    fn find_handler(&self, ty: &ValueType) -> Option<Arc<dyn ArgumentHandler>>;
}

/// Parse a literal through whatever handler `lookup` resolves for `param`.
pub fn parse_value(
    lookup: &dyn HandlerLookup,
    param: &ParameterDescriptor,
    literal: &str,
) -> Result<Value, ArgumentParseError> {
    match lookup.find_handler(param.value_type()) {
        Some(handler) => handler.parse(lookup, param, literal),
        None => Err(ArgumentParseError::new(
            param.label(),
            literal,
            format!("no handler for type '{}'", param.signature()),
        )),
    }
}

/// Usage syntax for `param`, or its signature when no handler exists.
pub fn describe(lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
    match lookup.find_handler(param.value_type()) {
        Some(handler) => handler.syntax(lookup, param),
        None => param.signature().to_string(),
    }
}

/// Check that every type reachable from `signature` has a handler and
/// every composite carries its generic arguments.
pub fn ensure_supported(
    lookup: &dyn HandlerLookup,
    parameter: &str,
    signature: &TypeSignature,
) -> Result<(), RegistryError> {
    let ty = signature.ty();
    if lookup.find_handler(ty).is_none() {
        return Err(RegistryError::MissingHandler {
            ty: signature.to_string(),
            parameter: parameter.to_string(),
        });
    }
    let expected = ty.arity();
    if signature.args().len() < expected {
        return Err(RegistryError::MissingTypeArgument {
            ty: signature.to_string(),
            parameter: parameter.to_string(),
            expected,
        });
    }
    for arg in signature.args() {
        ensure_supported(lookup, parameter, arg)?;
    }
    Ok(())
}

// =============================================================================
// Shared helpers for built-in handlers
// =============================================================================

/// Fail unless the literal satisfies the parameter's match set.
pub(crate) fn check_matches(
    param: &ParameterDescriptor,
    literal: &str,
) -> Result<(), ArgumentParseError> {
    match &param.constraints().matches {
        Some(set) if !set.matches(literal) => Err(ArgumentParseError::new(
            param.label(),
            literal,
            format!("expected one of {}", set.describe()),
        )),
        _ => Ok(()),
    }
}

/// Fail unless `len` is inside the parameter's length bounds.
pub(crate) fn check_length(
    param: &ParameterDescriptor,
    literal: &str,
    len: usize,
    unit: &str,
) -> Result<(), ArgumentParseError> {
    match &param.constraints().length {
        Some(bounds) => bounds
            .check(len, unit)
            .map_err(|reason| ArgumentParseError::new(param.label(), literal, reason)),
        None => Ok(()),
    }
}

/// The generic argument at `index`, or a parse error naming it.
pub(crate) fn type_argument<'a>(
    param: &'a ParameterDescriptor,
    literal: &str,
    index: usize,
) -> Result<&'a TypeSignature, ArgumentParseError> {
    param.signature().arg(index).ok_or_else(|| {
        ArgumentParseError::new(
            param.label(),
            literal,
            format!("type '{}' is missing a type argument", param.signature()),
        )
    })
}
