//! Core types for verba
//!
//! This crate defines the foundational types used throughout the system:
//! - Token / tokenize: bracket- and quote-aware input splitting
//! - ValueType / TypeSignature: the type model handlers are keyed by
//! - Value / Arguments: runtime values and the reified argument list
//! - ParameterDescriptor / ExecutableDescriptor: registered command shapes
//! - Constraints: length, match and clamp metadata
//! - Invocation / ResultCode: the command body boundary
//! - Error: resolution error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constraints;
pub mod descriptor;
pub mod error;
pub mod invocation;
pub mod lexer;
pub mod result;
pub mod types;
pub mod value;

pub use constraints::{Clamp, Constraints, LengthBounds, MatchSet};
pub use descriptor::{
    ExecutableBuilder, ExecutableDescriptor, FlagKind, FlagSpec, ParameterDescriptor,
};
pub use error::{
    ArgumentCountError, ArgumentParseError, DescriptorError, Error, PathError, ReificationError,
    Result, TokenizationError,
};
pub use invocation::{CancelToken, CommandBody, Invocation, NullSink, OutputSink};
pub use lexer::{tokenize, Token};
pub use result::ResultCode;
pub use types::{CustomType, EnumType, TypeSignature, ValueType};
pub use value::{Argument, Arguments, FromValue, Value, ValueError};

pub use bigdecimal::num_bigint::BigInt;
pub use bigdecimal::BigDecimal;
