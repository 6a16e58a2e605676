//! One-stop compilation front end.
//!
//! A [`Session`] owns the finalized decision graph for one rule set and
//! hands out the downstream products: generated scanner source, dot
//! renderings, and an in-process [`Machine`] for direct execution.

use crate::Result;
use crate::emit;
use crate::graph::{self, Graph};
use crate::interp::Machine;

/// Knobs for a single compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Merge equivalent sibling branches before ID assignment.
    pub simplify: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { simplify: true }
    }
}

/// A compiled rule set.
#[derive(Debug)]
pub struct Session {
    graph: Graph,
}

impl Session {
    /// Build, optionally simplify, and number the graph for `rules`.
    pub fn compile(rules: &str, opts: &CompileOptions) -> Result<Session> {
        let mut graph = graph::build(rules)?;
        if opts.simplify {
            graph::simplify(&mut graph);
        }
        graph::assign_ids(&mut graph)?;
        Ok(Session { graph })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Render the graph in Graphviz dot form.
    pub fn to_dot(&self) -> String {
        graph::to_dot(&self.graph)
    }

    /// Generate the scanner module source.
    pub fn emit_scanner(&self) -> Result<String> {
        Ok(emit::emit(&self.graph)?)
    }

    /// An interpreter over the compiled graph.
    pub fn machine(&self) -> Machine<'_> {
        Machine::new(&self.graph)
    }
}
