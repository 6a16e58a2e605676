//! Scanner code generation.

use std::fmt::Write;

use crate::charset::Matcher;
use crate::edges::{Edge, EdgeKind, collect};
use crate::error::InternalError;
use crate::graph::{Graph, ROOT_STATE};

/// Emit the scanner module for a finalized graph.
pub fn emit(graph: &Graph) -> Result<String, InternalError> {
    // Emission never runs on a half-built graph; a node without an ID
    // here is a builder bug, not a user error.
    for node in graph.reachable() {
        if graph[node].id == 0 {
            return Err(InternalError::UnassignedNodeId(node.index()));
        }
    }

    let edges = collect(graph);
    let mut out = String::new();

    header(&mut out, graph.actions.len());
    prelude(&mut out);
    scan_fn(&mut out, graph, &edges);
    out.push_str("}\n");
    Ok(out)
}

fn header(out: &mut String, rules: usize) {
    writeln!(out, "// Generated by scangen from {rules} rules. Do not edit.").unwrap();
    writeln!(out, "//").unwrap();
    writeln!(
        out,
        "// `scan` matches the longest rule at the current position (earliest"
    )
    .unwrap();
    writeln!(
        out,
        "// rule wins ties) and runs the matched rule's action code."
    )
    .unwrap();
    out.push('\n');
}

/// The fixed runtime scaffolding every generated module carries.
fn prelude(out: &mut String) {
    out.push_str(
        r#"/// Pull-based character source with rewind support.
pub trait CharSource {
    /// Next byte, or `None` at end of input.
    fn next_char(&mut self) -> Option<u8>;
    /// Current read position in bytes.
    fn pos(&self) -> usize;
    /// Make the next read happen at `pos`.
    fn rewind_to(&mut self, pos: usize);
    /// The bytes at `[start, start + len)`.
    fn slice(&self, start: usize, len: usize) -> &[u8];
}

/// In-memory source over a byte slice.
pub struct SliceSource<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

impl CharSource for SliceSource<'_> {
    fn next_char(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn rewind_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn slice(&self, start: usize, len: usize) -> &[u8] {
        &self.input[start..start + len]
    }
}

/// No rule matched at `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch {
    pub pos: usize,
}

pub struct Scanner<S> {
    pub src: S,
    cur: Vec<u32>,
    next: Vec<u32>,
    pub last_accepted: u32,
    pub match_start: usize,
    pub match_len: usize,
}

impl<S: CharSource> Scanner<S> {
    pub fn new(src: S) -> Self {
        Self {
            src,
            cur: Vec::new(),
            next: Vec::new(),
            last_accepted: 0,
            match_start: 0,
            match_len: 0,
        }
    }

    /// Bytes of the most recent match.
    pub fn token_text(&self) -> &[u8] {
        self.src.slice(self.match_start, self.match_len)
    }

    fn push_next(&mut self, state: u32) {
        if !self.next.contains(&state) {
            self.next.push(state);
        }
    }

"#,
    );
}

/// The generated `scan` method: frontier loop, decision chain, dispatch.
fn scan_fn(out: &mut String, graph: &Graph, edges: &[Edge]) {
    writeln!(
        out,
        "    /// Match one token at the current position and run its action."
    )
    .unwrap();
    writeln!(out, "    pub fn scan(&mut self) -> Result<(), NoMatch> {{").unwrap();
    writeln!(out, "        self.next.clear();").unwrap();
    writeln!(out, "        self.next.push({ROOT_STATE});").unwrap();
    writeln!(out, "        self.last_accepted = 0;").unwrap();
    writeln!(out, "        self.match_start = self.src.pos();").unwrap();
    writeln!(out, "        self.match_len = 0;").unwrap();
    writeln!(out, "        let mut eof_seen: Vec<u32> = Vec::new();").unwrap();
    writeln!(out, "        while !self.next.is_empty() {{").unwrap();
    writeln!(
        out,
        "            std::mem::swap(&mut self.cur, &mut self.next);"
    )
    .unwrap();
    writeln!(out, "            self.next.clear();").unwrap();
    writeln!(out, "            let iter_start = self.src.pos();").unwrap();
    writeln!(
        out,
        "            // One byte per macro-step. Even IDs are matching"
    )
    .unwrap();
    writeln!(
        out,
        "            // states; only they consume input."
    )
    .unwrap();
    writeln!(
        out,
        "            let reading = self.cur.iter().any(|&s| s & 1 == 0);"
    )
    .unwrap();
    writeln!(
        out,
        "            let ch = if reading {{ self.src.next_char() }} else {{ None }};"
    )
    .unwrap();
    writeln!(out, "            let at_eof = reading && ch.is_none();").unwrap();
    writeln!(out, "            let mut best_action = u32::MAX;").unwrap();
    writeln!(
        out,
        "            while let Some(state) = self.cur.pop() {{"
    )
    .unwrap();

    decision_chain(out, edges);

    writeln!(out, "            }}").unwrap();
    writeln!(out, "            if best_action != u32::MAX {{").unwrap();
    writeln!(out, "                self.last_accepted = best_action;").unwrap();
    writeln!(
        out,
        "                self.match_len = iter_start - self.match_start;"
    )
    .unwrap();
    writeln!(out, "            }}").unwrap();
    writeln!(
        out,
        "            // Past end of input a state's successors never change;"
    )
    .unwrap();
    writeln!(
        out,
        "            // each state gets one EOF step so end-of-input"
    )
    .unwrap();
    writeln!(out, "            // matchers can still fire.").unwrap();
    writeln!(out, "            if at_eof {{").unwrap();
    writeln!(
        out,
        "                self.next.retain(|&s| !eof_seen.contains(&s));"
    )
    .unwrap();
    writeln!(
        out,
        "                eof_seen.extend(self.next.iter().copied());"
    )
    .unwrap();
    writeln!(out, "            }}").unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(out, "        if self.last_accepted == 0 {{").unwrap();
    writeln!(
        out,
        "            return Err(NoMatch {{ pos: self.match_start }});"
    )
    .unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(
        out,
        "        // Backtrack to the end of the longest accepted match."
    )
    .unwrap();
    writeln!(
        out,
        "        self.src.rewind_to(self.match_start + self.match_len);"
    )
    .unwrap();

    dispatch(out, graph);

    writeln!(out, "        Ok(())").unwrap();
    writeln!(out, "    }}").unwrap();
}

/// Render the guard of one transition.
fn state_cond(cond: &[u32]) -> String {
    if cond.len() == 1 {
        format!("state == {}", cond[0])
    } else {
        let parts = cond
            .iter()
            .map(|s| format!("state == {s}"))
            .collect::<Vec<_>>()
            .join(" || ");
        format!("({parts})")
    }
}

/// Whether two adjacent match edges may share an `if`/`else if` chain:
/// plain literals from the same states are mutually exclusive. A literal
/// competing against a sibling list must stay an independent `if` so both
/// get a chance to fire.
fn chains_with(prev: &Edge, edge: &Edge) -> bool {
    match (&prev.kind, &edge.kind) {
        (
            EdgeKind::Match {
                matcher: Matcher::Char(_),
                stale_remove: None,
                ..
            },
            EdgeKind::Match {
                matcher: Matcher::Char(_),
                stale_remove: None,
                ..
            },
        ) => prev.cond == edge.cond,
        _ => false,
    }
}

fn decision_chain(out: &mut String, edges: &[Edge]) {
    let pad = "                ";
    for (i, edge) in edges.iter().enumerate() {
        let chained = i > 0 && chains_with(&edges[i - 1], edge);
        let lead = if chained {
            format!("{pad}}} else if ")
        } else {
            format!("{pad}if ")
        };
        match &edge.kind {
            EdgeKind::Accept { action } => {
                writeln!(out, "{lead}{} {{", state_cond(&edge.cond)).unwrap();
                writeln!(out, "{pad}    if {action} < best_action {{").unwrap();
                writeln!(out, "{pad}        best_action = {action};").unwrap();
                writeln!(out, "{pad}    }}").unwrap();
            }
            EdgeKind::Match {
                target,
                matcher,
                stale_remove,
            } => {
                writeln!(
                    out,
                    "{lead}{} && {} {{",
                    state_cond(&edge.cond),
                    matcher.to_cond("ch")
                )
                .unwrap();
                writeln!(out, "{pad}    self.push_next({target});").unwrap();
                if let Some(repeat) = stale_remove {
                    // Advancing past a repeat drops its stale frontier
                    // entry, so the repeated class cannot keep swallowing
                    // characters after the continuation began.
                    writeln!(out, "{pad}    if state == {repeat} {{").unwrap();
                    writeln!(
                        out,
                        "{pad}        self.next.retain(|&s| s != {repeat});"
                    )
                    .unwrap();
                    writeln!(out, "{pad}    }}").unwrap();
                }
            }
        }
        let next_chains = edges
            .get(i + 1)
            .is_some_and(|next| chains_with(edge, next));
        if !next_chains {
            writeln!(out, "{pad}}}").unwrap();
        }
    }
}

/// Branch-on-ID action dispatch.
fn dispatch(out: &mut String, graph: &Graph) {
    writeln!(out, "        match self.last_accepted {{").unwrap();
    for &action in &graph.actions {
        let id = graph[action].id;
        let text = graph[action].action_text().unwrap_or_default();
        if text.is_empty() {
            writeln!(out, "            {id} => {{}}").unwrap();
        } else {
            writeln!(out, "            {id} => {{").unwrap();
            writeln!(out, "                {text}").unwrap();
            writeln!(out, "            }}").unwrap();
        }
    }
    writeln!(out, "            _ => {{}}").unwrap();
    writeln!(out, "        }}").unwrap();
}
