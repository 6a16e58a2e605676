//! Debug export of the graph in Graphviz dot format.
//!
//! Human inspection only; the compiler never reads this back and the
//! emitted scanner is unaffected.

use std::fmt::Write;

use crate::graph::node::{Graph, NodeId, NodeKind, ROOT};

/// Render the reachable graph as a `digraph`.
pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::new();
    writeln!(out, "digraph scangen {{").unwrap();
    writeln!(out, "  rankdir=LR;").unwrap();
    writeln!(out, "  node [shape=box];").unwrap();

    for id in graph.reachable() {
        writeln!(out, "  {} [label=\"{}\"];", id, label(graph, id)).unwrap();
        for &child in &graph[id].children {
            writeln!(out, "  {} -> {};", id, child).unwrap();
        }
        if let Some(target) = graph[id].repeat_target {
            writeln!(out, "  {} -> {} [style=dashed];", id, target).unwrap();
        }
    }

    writeln!(out, "}}").unwrap();
    out
}

fn label(graph: &Graph, id: NodeId) -> String {
    let node = &graph[id];
    let mut text = match &node.kind {
        NodeKind::Root => format!("{}: ROOT", node.id),
        NodeKind::Action(action) => format!("{}: ACT {}", node.id, escape(action)),
        NodeKind::Group => format!("{}: GROUP", node.id),
        NodeKind::Match(matcher) => format!("{}: {}", node.id, escape(&matcher.to_string())),
    };
    if graph.is_self_repeat(id) || (id != ROOT && !node.repeat_sources.is_empty()) {
        text.push_str("\\nKLEENE");
    }
    text
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
