//! Rust scanner-module emission.
//!
//! Walks the finalized graph's transition list and renders a
//! self-contained Rust module: the `CharSource` trait the host
//! implements, a `Scanner` owning the two frontier stacks, the generated
//! decision chain stepped once per consumed byte, and the action dispatch
//! keyed on the accepted state's odd ID.

mod emitter;


pub use emitter::emit;
