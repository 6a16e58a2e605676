use indoc::indoc;

use crate::charset::Matcher;
use crate::error::Error;
use crate::graph::build::build;
use crate::graph::node::{Graph, NodeId, ROOT};

fn child_with(graph: &Graph, parent: NodeId, b: u8) -> NodeId {
    graph[parent]
        .children
        .iter()
        .copied()
        .find(|&c| graph[c].matcher() == Some(&Matcher::Char(b)))
        .unwrap_or_else(|| panic!("no child matching {:?} under {parent}", b as char))
}

#[test]
fn single_rule_is_a_chain_ending_in_an_action() {
    let graph = build("ab\tEMIT\n").unwrap();
    let a = child_with(&graph, ROOT, b'a');
    let b = child_with(&graph, a, b'b');
    assert_eq!(graph[b].children.len(), 1);
    let action = graph[b].children[0];
    assert_eq!(graph[action].action_text(), Some("EMIT"));
    assert_eq!(graph.actions, vec![action]);
}

#[test]
fn rules_share_a_common_prefix() {
    let graph = build(indoc! {"
        ab\tX
        ac\tY
    "})
    .unwrap();
    assert_eq!(graph[ROOT].children.len(), 1);
    let a = child_with(&graph, ROOT, b'a');
    child_with(&graph, a, b'b');
    child_with(&graph, a, b'c');
}

#[test]
fn action_is_prepended_before_longer_continuations() {
    let graph = build(indoc! {"
        ab\tSHORT
        abc\tLONG
    "})
    .unwrap();
    let a = child_with(&graph, ROOT, b'a');
    let b = child_with(&graph, a, b'b');
    assert!(graph[graph[b].children[0]].is_action());
    let c = child_with(&graph, b, b'c');
    assert!(graph[graph[c].children[0]].is_action());
}

#[test]
fn actions_are_recorded_in_definition_order() {
    let graph = build(indoc! {"
        x\tFIRST
        y\tSECOND
        z\tTHIRD
    "})
    .unwrap();
    let texts: Vec<_> = graph
        .actions
        .iter()
        .map(|&a| graph[a].action_text().unwrap())
        .collect();
    assert_eq!(texts, ["FIRST", "SECOND", "THIRD"]);
}

#[test]
fn escapes_resolve_to_bytes_and_classes() {
    let graph = build("\\ta\tX\n").unwrap();
    let tab = child_with(&graph, ROOT, b'\t');
    child_with(&graph, tab, b'a');

    let graph = build("\\d\tX\n").unwrap();
    let digit = graph[ROOT].children[0];
    assert!(matches!(
        graph[digit].matcher(),
        Some(Matcher::Class(crate::charset::CharClass::Digit))
    ));
}

#[test]
fn metacharacters_escape_to_their_literal_selves() {
    let graph = build("\\*\\(\tX\n").unwrap();
    let star = child_with(&graph, ROOT, b'*');
    child_with(&graph, star, b'(');
}

#[test]
fn unknown_escape_is_rejected() {
    let err = build("\\q\tX\n").unwrap_err();
    assert!(matches!(err, Error::UnknownEscapeSequence { found: 'q', .. }));
}

#[test]
fn star_on_a_fresh_unit_repeats_in_place() {
    let graph = build("a*b\tX\n").unwrap();
    let a = child_with(&graph, ROOT, b'a');
    assert!(graph.is_self_repeat(a));
    child_with(&graph, a, b'b');
}

#[test]
fn star_on_a_continued_unit_clones_beside_it() {
    let graph = build(indoc! {"
        ab\tX
        a*c\tY
    "})
    .unwrap();
    // The original 'a' keeps its non-repeating continuation intact.
    assert_eq!(graph[ROOT].children.len(), 2);
    let plain = graph[ROOT].children[0];
    let clone = graph[ROOT].children[1];
    assert!(!graph.is_self_repeat(plain));
    assert!(graph.is_self_repeat(clone));
    child_with(&graph, plain, b'b');
    child_with(&graph, clone, b'c');
}

#[test]
fn star_reuses_an_existing_repeat_sibling() {
    let graph = build(indoc! {"
        a*b\tX
        ab\tY
        a*d\tZ
    "})
    .unwrap();
    assert_eq!(graph[ROOT].children.len(), 2);
    let repeats: Vec<_> = graph[ROOT]
        .children
        .iter()
        .copied()
        .filter(|&c| graph.is_self_repeat(c))
        .collect();
    assert_eq!(repeats.len(), 1);
    child_with(&graph, repeats[0], b'b');
    child_with(&graph, repeats[0], b'd');
}

#[test]
fn plus_adds_a_repeating_clone_below_the_unit() {
    let graph = build("a+\tX\n").unwrap();
    let a = child_with(&graph, ROOT, b'a');
    assert!(!graph.is_self_repeat(a));
    let clone = child_with(&graph, a, b'a');
    assert!(graph.is_self_repeat(clone));
    assert!(graph[graph[clone].children[0]].is_action());
}

#[test]
fn group_alternatives_share_one_continuation_node() {
    let graph = build("(ab|cd)e\tX\n").unwrap();
    let head = graph[ROOT].children[0];
    assert!(graph[head].is_group());
    let a = child_with(&graph, head, b'a');
    let c = child_with(&graph, head, b'c');
    let e1 = child_with(&graph, child_with(&graph, a, b'b'), b'e');
    let e2 = child_with(&graph, child_with(&graph, c, b'd'), b'e');
    assert_eq!(e1, e2);
}

#[test]
fn top_level_alternation_shares_the_action() {
    let graph = build("ab|cd\tX\n").unwrap();
    let b = child_with(&graph, child_with(&graph, ROOT, b'a'), b'b');
    let d = child_with(&graph, child_with(&graph, ROOT, b'c'), b'd');
    let action = graph.actions[0];
    assert!(graph[b].children.contains(&action));
    assert!(graph[d].children.contains(&action));
}

#[test]
fn starred_group_loops_back_and_can_be_skipped() {
    let graph = build("(ab)*c\tX\n").unwrap();
    let head = graph[ROOT].children[0];
    assert!(graph.is_self_repeat(head));
    let b = child_with(&graph, child_with(&graph, head, b'a'), b'b');
    assert_eq!(graph[b].repeat_target, Some(head));
    // Zero occurrences: the continuation hangs off the root too.
    let c = child_with(&graph, b, b'c');
    assert!(graph[ROOT].children.contains(&c));
}

#[test]
fn list_collects_literal_members_including_space() {
    let graph = build("[a ]\tX\n").unwrap();
    let node = graph[ROOT].children[0];
    match graph[node].matcher() {
        Some(Matcher::List(list)) => {
            assert_eq!(list.items(), &[Matcher::Char(b'a'), Matcher::Char(b' ')]);
            assert!(list.matches(Some(b' ')));
        }
        other => panic!("expected a list matcher, got {other:?}"),
    }
}

#[test]
fn dot_matches_any_byte() {
    let graph = build("a.b\tX\n").unwrap();
    let a = child_with(&graph, ROOT, b'a');
    let any = graph[a].children[0];
    assert!(matches!(graph[any].matcher(), Some(Matcher::Any)));
}

#[test]
fn blank_lines_and_indentation_are_tolerated() {
    let graph = build("\n  ab\tX\n\n").unwrap();
    assert_eq!(graph.actions.len(), 1);
}

#[test]
fn syntax_errors_are_diagnosed() {
    use Error::*;
    let cases: &[(&str, fn(&Error) -> bool)] = &[
        ("(ab\tX\n", |e| matches!(e, GroupNotClosed { .. })),
        ("ab)\tX\n", |e| matches!(e, GroupNeverOpened { .. })),
        ("(ab)+\tX\n", |e| {
            matches!(e, KleenePlusUnsupportedOnGroup { .. })
        }),
        ("*a\tX\n", |e| {
            matches!(e, KleeneStarWithoutPrecedingUnit { .. })
        }),
        ("+a\tX\n", |e| {
            matches!(e, KleenePlusWithoutPrecedingUnit { .. })
        }),
        ("[a.]\tX\n", |e| matches!(e, DotInsideList { .. })),
        ("[a[\tX\n", |e| matches!(e, ListInsideList { .. })),
        ("]a\tX\n", |e| matches!(e, ClosingListNeverOpened { .. })),
        ("^a\tX\n", |e| matches!(e, InvertingListNeverOpened { .. })),
        ("[ab", |e| matches!(e, ListNotClosed { .. })),
        ("ab\n", |e| matches!(e, NoActionGivenForToken { .. })),
        ("ab", |e| matches!(e, NoActionGivenForToken { .. })),
    ];
    for (rules, check) in cases {
        let err = build(rules).unwrap_err();
        assert!(check(&err), "rules {rules:?} produced {err:?}");
    }
}

#[test]
fn errors_carry_line_and_column() {
    let err = build("ok\tGOOD\nbad)\tX\n").unwrap_err();
    match err {
        Error::GroupNeverOpened { line, col } => {
            assert_eq!(line, 2);
            assert_eq!(col, 4);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
