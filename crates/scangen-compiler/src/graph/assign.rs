//! Node-ID assignment.
//!
//! Runs after simplification. Action nodes get odd IDs (2k+1) in rule
//! definition order, so the lowest action ID is always the earliest
//! defined rule; all other reachable nodes get even IDs in pre-order with
//! the root pre-assigned the reserved ID 2. Zero stays the "unassigned"
//! sentinel and doubles as "no accepted state" in the emitted runtime.

use crate::error::InternalError;
use crate::graph::node::{Graph, ROOT};

/// Reserved even ID for the root state.
pub const ROOT_STATE: u32 = 2;

/// Assign IDs to every reachable node and check the result.
pub fn assign_ids(graph: &mut Graph) -> Result<(), InternalError> {
    for node in graph.reachable() {
        graph[node].id = 0;
    }

    let actions = graph.actions.clone();
    for (k, action) in actions.iter().enumerate() {
        graph[*action].id = 2 * k as u32 + 1;
    }

    graph[ROOT].id = ROOT_STATE;
    let mut next_even = ROOT_STATE + 2;

    graph.clear_visited();
    let mut stack = vec![ROOT];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut graph[id].visited, true) {
            continue;
        }
        if graph[id].id == 0 {
            graph[id].id = next_even;
            next_even += 2;
        }
        for &child in graph[id].children.iter().rev() {
            stack.push(child);
        }
    }

    verify(graph)
}

/// Post-condition check before emission: every reachable node is numbered
/// and repeat references are consistent. Failure signals a builder bug.
fn verify(graph: &Graph) -> Result<(), InternalError> {
    for node in graph.reachable() {
        if graph[node].id == 0 {
            return Err(InternalError::UnassignedNodeId(node.index()));
        }
        if let Some(target) = graph[node].repeat_target {
            if target.index() >= graph.len() || graph[target].id == 0 {
                return Err(InternalError::DanglingRepeat(node.index()));
            }
            if !graph[target].repeat_sources.contains(&node) {
                return Err(InternalError::DanglingRepeat(node.index()));
            }
        }
        for &source in &graph[node].repeat_sources {
            if graph[source].repeat_target != Some(node) {
                return Err(InternalError::DanglingRepeat(node.index()));
            }
        }
    }
    Ok(())
}
