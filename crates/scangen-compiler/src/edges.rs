//! Guarded-transition derivation.
//!
//! Flattens the finalized, ID-assigned graph into an ordered list of
//! transitions. Each transition carries the set of frontier states it
//! fires from: the owning state itself, bypass states for skippable
//! repeats (a Kleene node may be entered "from the parent" after zero
//! occurrences), loop re-entry states from a group head's repeat sources,
//! and the self-loop state for a repeat child. The emitter renders this
//! list as the generated decision chain and the interpreter executes it
//! directly, so both always agree.

use indexmap::IndexSet;

use crate::charset::Matcher;
use crate::graph::{Graph, NodeId, NodeKind, ROOT};

/// One guarded transition of the scanner.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Frontier states this transition fires from, sorted ascending.
    pub cond: Vec<u32>,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub enum EdgeKind {
    /// Consume the current byte if the matcher accepts it and activate
    /// `target` for the next step.
    Match {
        target: u32,
        matcher: Matcher,
        /// For edges advancing past a self-repeat node: the repeat state
        /// to drop from the next frontier, so an earlier repeated class
        /// cannot over-greedily swallow trailing characters.
        stale_remove: Option<u32>,
    },
    /// Zero-consuming acceptance: fold `action` into this iteration's
    /// highest-priority (lowest-ID) accepted action.
    Accept { action: u32 },
}

/// Derive the transition list, in emission order (pre-order from the
/// root, a node's own edges before its children's).
pub fn collect(graph: &Graph) -> Vec<Edge> {
    let ctx = Ctx {
        graph,
        parents: graph.parent_map(),
    };

    let mut edges = Vec::new();
    let mut seen = vec![false; graph.len()];
    let mut queue = vec![ROOT];
    while let Some(node) = queue.pop() {
        if std::mem::replace(&mut seen[node.index()], true) {
            continue;
        }
        for &child in &graph[node].children {
            match &graph[child].kind {
                NodeKind::Action(_) => edges.push(Edge {
                    cond: ctx.cond_for(node, child),
                    kind: EdgeKind::Accept {
                        action: graph[child].id,
                    },
                }),
                NodeKind::Match(matcher) => {
                    let stale_remove = (!graph[node].is_group()
                        && graph.is_self_repeat(node))
                    .then(|| graph[node].id);
                    edges.push(Edge {
                        cond: ctx.cond_for(node, child),
                        kind: EdgeKind::Match {
                            target: graph[child].id,
                            matcher: matcher.clone(),
                            stale_remove,
                        },
                    });
                }
                NodeKind::Group | NodeKind::Root => {}
            }
        }
        for &child in graph[node].children.iter().rev() {
            queue.push(child);
        }
    }
    edges
}

struct Ctx<'g> {
    graph: &'g Graph,
    parents: Vec<Vec<NodeId>>,
}

impl Ctx<'_> {
    /// The frontier states from which the edge `parent -> child` fires.
    fn cond_for(&self, parent: NodeId, child: NodeId) -> Vec<u32> {
        let mut states = IndexSet::new();
        if self.graph[parent].is_group() {
            self.group_entry(parent, &mut states);
        } else {
            self.after_states(parent, &mut states);
        }
        // Self-loop: a repeat child may be re-entered from itself.
        if self.graph.is_self_repeat(child) {
            states.insert(child);
        }
        // Group nodes are transparent; they never appear in the frontier.
        let mut cond: Vec<u32> = states
            .into_iter()
            .filter(|&n| !self.graph[n].is_group())
            .map(|n| self.graph[n].id)
            .collect();
        cond.sort_unstable();
        cond.dedup();
        cond
    }

    /// States representing "this node's occurrence is complete".
    fn after_states(&self, node: NodeId, out: &mut IndexSet<NodeId>) {
        if !out.insert(node) {
            return;
        }
        // Repeat bypass: zero occurrences of a self-repeat node mean the
        // automaton is still at the node's entry point.
        if self.graph.is_self_repeat(node) {
            self.entry_states(node, out);
        }
    }

    /// States at a node's entry point: wherever each tree parent ends.
    fn entry_states(&self, node: NodeId, out: &mut IndexSet<NodeId>) {
        for i in 0..self.parents[node.index()].len() {
            let parent = self.parents[node.index()][i];
            if self.graph[parent].is_group() {
                self.group_entry(parent, out);
            } else {
                self.after_states(parent, out);
            }
        }
    }

    /// States from which a group's branch heads are reachable: the
    /// group's own entry points, plus every tail that loops back in.
    fn group_entry(&self, group: NodeId, out: &mut IndexSet<NodeId>) {
        if !out.insert(group) {
            return;
        }
        self.entry_states(group, out);
        for i in 0..self.graph[group].repeat_sources.len() {
            let source = self.graph[group].repeat_sources[i];
            if source != group {
                self.after_states(source, out);
            }
        }
    }
}
