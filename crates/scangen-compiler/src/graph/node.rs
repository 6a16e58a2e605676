//! Arena-backed graph nodes.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::charset::Matcher;

/// Handle to a node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The single entry state.
    Root,
    /// "A rule fully matched here"; carries the verbatim action text.
    /// Terminal: action nodes have no children.
    Action(String),
    /// Transparent grouping node for `(...)`; its children are alternation
    /// branch heads. Never matched against itself.
    Group,
    /// A matching state consuming one input byte.
    Match(Matcher),
}

/// One matching state.
#[derive(Debug, Clone)]
pub struct Node {
    /// Assigned identifier; 0 = unassigned. Action nodes get odd IDs,
    /// everything else even, so the emitted runtime can test the node kind
    /// by parity alone.
    pub id: u32,
    pub kind: NodeKind,
    /// Child states reached by consuming one matching byte. Ordered:
    /// first-defined-first-matched, except where the simplifier merges.
    pub children: Vec<NodeId>,
    /// Back-edge implementing Kleene closure: after this node, the
    /// target's outgoing edges apply again. Self-reference for single-node
    /// repeats; group head for `(...)*` tails.
    pub repeat_target: Option<NodeId>,
    /// Reverse of `repeat_target`: nodes that loop back into this one.
    pub repeat_sources: Vec<NodeId>,
    /// Transient traversal marker, cleared before each full-graph pass.
    pub visited: bool,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            id: 0,
            kind,
            children: Vec::new(),
            repeat_target: None,
            repeat_sources: Vec::new(),
            visited: false,
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, NodeKind::Action(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn matcher(&self) -> Option<&Matcher> {
        match &self.kind {
            NodeKind::Match(m) => Some(m),
            _ => None,
        }
    }

    pub fn action_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Action(text) => Some(text),
            _ => None,
        }
    }
}

/// The pattern graph: an arena of nodes plus the action registry.
///
/// Nodes are never freed individually; the whole graph drops at session
/// end. Merged-away nodes simply become unreachable.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    /// Action nodes in rule-definition order; the ID assignor numbers them
    /// 1, 3, 5... from this list so the earliest rule gets the lowest ID.
    pub actions: Vec<NodeId>,
}

pub const ROOT: NodeId = NodeId(0);

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            actions: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the node loops back into itself (`a*` style repeat).
    pub fn is_self_repeat(&self, id: NodeId) -> bool {
        self[id].repeat_target == Some(id)
    }

    /// Convert a node into a self-referencing repeat. Idempotent.
    pub fn make_self_repeat(&mut self, id: NodeId) {
        if self.is_self_repeat(id) {
            return;
        }
        self[id].repeat_target = Some(id);
        self[id].repeat_sources.push(id);
    }

    /// Register `source` as looping back into `target`.
    pub fn add_repeat_edge(&mut self, source: NodeId, target: NodeId) {
        self[source].repeat_target = Some(target);
        if !self[target].repeat_sources.contains(&source) {
            self[target].repeat_sources.push(source);
        }
    }

    /// Reset the traversal marker on every node.
    pub fn clear_visited(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
    }

    /// All nodes reachable from the root through child edges, pre-order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            order.push(id);
            for &child in self[id].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Tree-sense parent lists (child edges only, not repeat back-edges).
    pub fn parent_map(&self) -> Vec<Vec<NodeId>> {
        let mut parents = vec![Vec::new(); self.nodes.len()];
        for id in self.reachable() {
            for &child in &self[id].children {
                if !parents[child.index()].contains(&id) {
                    parents[child.index()].push(id);
                }
            }
        }
        parents
    }

    /// The action text for an assigned action ID.
    pub fn action_by_id(&self, id: u32) -> Option<&str> {
        debug_assert!(id % 2 == 1);
        self.actions
            .iter()
            .find(|&&a| self[a].id == id)
            .and_then(|&a| self[a].action_text())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Graph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
