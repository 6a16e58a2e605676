//! In-process execution of a compiled graph.
//!
//! Runs the same guarded-transition list the emitter renders, with the
//! same two-stack frontier stepping, so rule files can be exercised
//! without generating and compiling scanner code. Powers `scangen exec`
//! and the semantic test suite.

use crate::edges::{Edge, EdgeKind, collect};
use crate::graph::{Graph, ROOT_STATE};

/// One accepted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'g> {
    /// Assigned (odd) ID of the winning action.
    pub action_id: u32,
    /// The rule's verbatim action text.
    pub action: &'g str,
    /// Byte offset of the match.
    pub start: usize,
    /// Matched length; zero-width acceptance is possible at end of input.
    pub len: usize,
}

/// Why tokenization stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("no rule matches at byte {pos}")]
    NoMatch { pos: usize },
    #[error("scanner made no progress at byte {pos} (zero-width match)")]
    NoProgress { pos: usize },
}

/// A compiled, directly executable rule set.
pub struct Machine<'g> {
    graph: &'g Graph,
    edges: Vec<Edge>,
}

impl<'g> Machine<'g> {
    /// Wrap a finalized (simplified, ID-assigned) graph.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            edges: collect(graph),
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Match one token at `start`: the longest accepted span, earliest
    /// rule on ties. Returns the winning action ID and match length.
    pub fn scan_at(&self, input: &[u8], start: usize) -> Option<(u32, usize)> {
        let mut cur: Vec<u32> = Vec::new();
        let mut next: Vec<u32> = vec![ROOT_STATE];
        let mut pos = start;
        let mut last_accepted = 0u32;
        let mut match_len = 0usize;
        let mut eof_seen: Vec<u32> = Vec::new();

        while !next.is_empty() {
            std::mem::swap(&mut cur, &mut next);
            next.clear();
            let iter_start = pos;

            // One byte per macro-step. Even IDs are matching states; only
            // they consume input.
            let reading = cur.iter().any(|&s| s & 1 == 0);
            let ch = if reading {
                let c = input.get(pos).copied();
                if c.is_some() {
                    pos += 1;
                }
                c
            } else {
                None
            };
            let at_eof = reading && ch.is_none();

            let mut best_action = u32::MAX;
            while let Some(state) = cur.pop() {
                for edge in &self.edges {
                    if !edge.cond.contains(&state) {
                        continue;
                    }
                    match &edge.kind {
                        EdgeKind::Accept { action } => {
                            if *action < best_action {
                                best_action = *action;
                            }
                        }
                        EdgeKind::Match {
                            target,
                            matcher,
                            stale_remove,
                        } => {
                            if matcher.matches(ch) {
                                if !next.contains(target) {
                                    next.push(*target);
                                }
                                if *stale_remove == Some(state) {
                                    next.retain(|&s| s != state);
                                }
                            }
                        }
                    }
                }
            }

            if best_action != u32::MAX {
                last_accepted = best_action;
                match_len = iter_start - start;
            }
            // Past end of input a state's successors never change, so each
            // state gets one EOF step. End-of-input matchers still fire
            // (their accepts land the iteration after), everything else
            // dies off.
            if at_eof {
                next.retain(|&s| !eof_seen.contains(&s));
                eof_seen.extend(next.iter().copied());
            }
        }

        (last_accepted != 0).then_some((last_accepted, match_len))
    }

    /// Tokenize the whole input, backtracking the cursor to each longest
    /// match. A position where no rule matches is a hard error.
    pub fn tokenize(&self, input: &[u8]) -> Result<Vec<Token<'g>>, ScanError> {
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        loop {
            match self.scan_at(input, pos) {
                Some((action_id, len)) => {
                    if len == 0 && pos < input.len() {
                        return Err(ScanError::NoProgress { pos });
                    }
                    tokens.push(Token {
                        action_id,
                        action: self.graph.action_by_id(action_id).unwrap_or_default(),
                        start: pos,
                        len,
                    });
                    pos += len;
                    // A zero-width acceptance can only be the final token.
                    if len == 0 || pos >= input.len() {
                        break;
                    }
                }
                None => {
                    if pos >= input.len() {
                        break;
                    }
                    return Err(ScanError::NoMatch { pos });
                }
            }
        }
        Ok(tokens)
    }
}
