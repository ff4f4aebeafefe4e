//! verba - typed command dispatch
//!
//! verba turns a line of text into a call of a registered command with
//! typed arguments: the line is tokenized, walked down a syntax trie of
//! command paths, and the remaining tokens are parsed by type-keyed
//! argument handlers.
//!
//! # Quick Start
//!
//! ```ignore
//! use verba::{CommandDispatcher, ExecutableDescriptor, ParameterDescriptor, ResultCode, TypeSignature};
//!
//! let dispatcher = CommandDispatcher::builder()
//!     .define(
//!         "run strings",
//!         ExecutableDescriptor::builder(|inv| {
//!             for s in inv.get::<Vec<String>>(0)? {
//!                 inv.out().write_line(&s);
//!             }
//!             Ok(ResultCode::Success)
//!         })
//!         .param(ParameterDescriptor::new("items", TypeSignature::array(TypeSignature::string()))),
//!     )
//!     .build()?;
//!
//! dispatcher.execute_sync(r#"run strings [foo, "Hello World!", baz]"#);
//! ```
//!
//! # Architecture
//!
//! | Crate | Provides |
//! |-------|----------|
//! | `verba-core` | Tokenizer, type model, descriptors, errors |
//! | `verba-handlers` | Handler and implicit registries, built-in handlers |
//! | `verba-engine` | Syntax trie, dispatch, reification |
//! | `verba-executor` | Dispatcher facade, worker pool, execution handles |

pub use verba_core::{
    tokenize, Argument, ArgumentCountError, ArgumentParseError, Arguments, BigDecimal, BigInt,
    CancelToken, Clamp, CommandBody, Constraints, CustomType, DescriptorError, EnumType, Error,
    ExecutableBuilder, ExecutableDescriptor, FlagKind, FlagSpec, FromValue, Invocation,
    LengthBounds, MatchSet, NullSink, OutputSink, ParameterDescriptor, PathError,
    ReificationError, Result, ResultCode, Token, TokenizationError, TypeSignature, Value,
    ValueError, ValueType,
};
pub use verba_engine::{CommandPath, Reifier, Resolution, SyntaxNode, SyntaxTrie};
pub use verba_executor::*;
pub use verba_handlers::{
    builtin, describe, ensure_supported, parse_value, ArgumentHandler, HandlerLookup,
    HandlerRegistry, HandlerRegistryBuilder, ImplicitProvider, ImplicitRegistry, RegistryError,
    Supplier,
};
