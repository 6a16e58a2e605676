//! The pattern graph: construction, simplification, and ID assignment.
//!
//! Rules are threaded one at a time into a prefix-shared graph of match
//! states. Kleene constructs add repeat back-edges, so the graph is not a
//! tree; every full-graph pass guards against revisits with the per-node
//! `visited` flag. Nodes live in an arena and are addressed by `NodeId`.
//!
//! Pass order: `build` -> `simplify` (optional) -> `assign` -> emission.

mod assign;
mod build;
mod dot;
mod node;
mod simplify;

#[cfg(test)]
mod assign_tests;
#[cfg(test)]
mod build_tests;

pub use assign::{ROOT_STATE, assign_ids};
pub use build::build;
pub use dot::to_dot;
pub use node::{Graph, Node, NodeId, NodeKind, ROOT};
pub use simplify::simplify;
