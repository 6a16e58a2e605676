//! Post-construction sibling merge.
//!
//! Prefix sharing during construction is greedy and local; alternation
//! joins in particular can leave adjacent sibling branches with identical
//! matchers. Merging them shrinks the emitted decision chain without
//! changing the recognized language. A merge is only legal where it
//! provably cannot change match outcomes: neither node participates in a
//! repeat relationship, neither holds an Action child, and the absorbed
//! node has a single parent (joins can share a node across parents, and
//! moving a shared node's children would corrupt the other branch).

use crate::graph::node::{Graph, NodeId, ROOT};

/// Merge adjacent identical siblings across the whole graph. Idempotent.
pub fn simplify(graph: &mut Graph) {
    let parents = graph.parent_map();
    graph.clear_visited();
    let mut stack = vec![ROOT];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut graph[id].visited, true) {
            continue;
        }
        merge_children(graph, id, &parents);
        for i in (0..graph[id].children.len()).rev() {
            stack.push(graph[id].children[i]);
        }
    }
}

fn merge_children(graph: &mut Graph, parent: NodeId, parents: &[Vec<NodeId>]) {
    let mut i = 0;
    while i + 1 < graph[parent].children.len() {
        let first = graph[parent].children[i];
        let second = graph[parent].children[i + 1];
        if mergeable(graph, first, second, parents) {
            let moved = std::mem::take(&mut graph[second].children);
            graph[first].children.extend(moved);
            graph[parent].children.remove(i + 1);
            // A successful merge can expose a further identical neighbor;
            // stay on the same index.
        } else {
            i += 1;
        }
    }
}

fn mergeable(graph: &Graph, a: NodeId, b: NodeId, parents: &[Vec<NodeId>]) -> bool {
    if a == b {
        return false;
    }
    let (na, nb) = (&graph[a], &graph[b]);
    match (na.matcher(), nb.matcher()) {
        (Some(ma), Some(mb)) if ma == mb => {}
        _ => return false,
    }
    if na.repeat_target.is_some() || !na.repeat_sources.is_empty() {
        return false;
    }
    if nb.repeat_target.is_some() || !nb.repeat_sources.is_empty() {
        return false;
    }
    if has_action_child(graph, a) || has_action_child(graph, b) {
        return false;
    }
    parents[a.index()].len() == 1 && parents[b.index()].len() == 1
}

fn has_action_child(graph: &Graph, id: NodeId) -> bool {
    graph[id].children.iter().any(|&c| graph[c].is_action())
}
