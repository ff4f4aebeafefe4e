//! Command resolution engine for verba
//!
//! This crate turns tokens into a selected executable plus arguments:
//! - CommandPath: alias-set paths such as `return|ret value`
//! - SyntaxTrie: merge-on-register command tree and dispatch
//! - Reifier: binds tokens to parameters (implicit, flags, positionals)
//!
//! Nothing here suspends or spawns; dispatch runs entirely on the caller's
//! thread and is safe to share once registration is complete.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod path;
pub mod reify;
pub mod trie;

pub use path::{AliasSet, CommandPath};
pub use reify::Reifier;
pub use trie::{Resolution, SyntaxNode, SyntaxTrie, SUGGESTION_THRESHOLD};
