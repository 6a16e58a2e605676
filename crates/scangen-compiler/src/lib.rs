//! scangen compiler: rule-file parser, pattern graph, and scanner emitter.
//!
//! This crate provides the compilation pipeline for scangen rule files:
//! - `reader` - character-stream reader over the rule file
//! - `charset` - character matchers and `[...]` lists
//! - `graph` - pattern graph construction, simplification, ID assignment
//! - `edges` - flattening of the finalized graph into guarded transitions
//! - `emit` - Rust scanner-module emission
//! - `interp` - in-process execution of a compiled graph
//! - `session` - high-level compile facade
//!
//! A rule file is a sequence of `<pattern> <action>` lines. All rules are
//! folded into one prefix-shared decision graph; the emitted scanner steps
//! a two-stack state frontier per input character, picks the longest match
//! (earliest rule on ties), and runs the matched rule's action code.

pub mod charset;
pub mod edges;
pub mod emit;
pub mod graph;
pub mod interp;
pub mod reader;
pub mod session;

mod error;

#[cfg(test)]
mod interp_tests;

pub use error::{Error, InternalError};
pub use session::{CompileOptions, Session};

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;
