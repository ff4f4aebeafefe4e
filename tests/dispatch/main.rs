//! Dispatch Integration Tests
//!
//! End-to-end tests through the `verba` facade: text input in, result
//! codes and sink output out.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test dispatch
//!
//! # One area
//! cargo test --test dispatch flags::
//! ```

mod common;

mod async_execution;
mod composites;
mod config_file;
mod flags;
mod registries;
mod resolution;
mod tokenizer;
