use indoc::indoc;

use crate::error::InternalError;
use crate::graph::assign::{ROOT_STATE, assign_ids};
use crate::graph::build::build;
use crate::graph::node::{NodeId, ROOT};
use crate::graph::simplify::simplify;

#[test]
fn root_gets_the_reserved_even_id() {
    let mut graph = build("a\tX\n").unwrap();
    assign_ids(&mut graph).unwrap();
    assert_eq!(graph[ROOT].id, ROOT_STATE);
}

#[test]
fn actions_get_odd_ids_in_definition_order() {
    let mut graph = build(indoc! {"
        abc\tFIRST
        a\tSECOND
        xyz\tTHIRD
    "})
    .unwrap();
    assign_ids(&mut graph).unwrap();
    let ids: Vec<_> = graph.actions.iter().map(|&a| graph[a].id).collect();
    assert_eq!(ids, [1, 3, 5]);
}

#[test]
fn every_reachable_node_is_numbered_with_the_right_parity() {
    let mut graph = build(indoc! {"
        hello\tX
        h[ik]\tY
        (ab|cd)*e\tZ
    "})
    .unwrap();
    simplify(&mut graph);
    assign_ids(&mut graph).unwrap();

    let mut seen = Vec::new();
    for node in graph.reachable() {
        let id = graph[node].id;
        assert_ne!(id, 0, "{node} left unassigned");
        assert_eq!(id % 2 == 1, graph[node].is_action(), "{node} parity");
        assert!(!seen.contains(&id), "{node} reuses ID {id}");
        seen.push(id);
    }
}

#[test]
fn reassignment_is_stable() {
    let mut graph = build("ab|cd\tX\n").unwrap();
    assign_ids(&mut graph).unwrap();
    let first: Vec<_> = graph.reachable().iter().map(|&n| graph[n].id).collect();
    assign_ids(&mut graph).unwrap();
    let second: Vec<_> = graph.reachable().iter().map(|&n| graph[n].id).collect();
    assert_eq!(first, second);
}

#[test]
fn inconsistent_repeat_edges_are_caught() {
    let mut graph = build("ab\tX\n").unwrap();
    let b = graph[graph[ROOT].children[0]].children[0];
    graph[b].repeat_target = Some(NodeId(0));
    let err = assign_ids(&mut graph).unwrap_err();
    assert!(matches!(err, InternalError::DanglingRepeat(_)));
}
