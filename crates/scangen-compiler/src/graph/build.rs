//! Pattern graph construction.
//!
//! Consumes the rule file one byte at a time and threads each rule's
//! pattern into the shared graph, merging with existing children where the
//! matcher content is identical (and the child is not a repeat node, which
//! is always an exclusive branch). The action text after the separator is
//! captured verbatim and attached as an Action child.

use crate::charset::{CharClass, CharacterList, Matcher};
use crate::error::Error;
use crate::graph::node::{Graph, NodeId, NodeKind, ROOT};
use crate::reader::Reader;

/// Build the pattern graph for a whole rule file.
pub fn build(input: &str) -> Result<Graph, Error> {
    Builder::new(input).run()
}

/// Result of resolving one escape letter.
enum Escape {
    Byte(u8),
    Class(CharClass),
}

/// The escape table: control characters, metacharacters mapped back to
/// their literal selves, and the named classes.
fn resolve_escape(ch: u8) -> Option<Escape> {
    let byte = match ch {
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'v' => 0x0b,
        b'0' => 0x00,
        b'\\' | b'\'' | b'"' | b'?' => ch,
        b'(' | b')' | b'|' | b'[' | b']' | b'^' | b'.' | b'*' | b'+' => ch,
        b'd' => return Some(Escape::Class(CharClass::Digit)),
        b'l' => return Some(Escape::Class(CharClass::Letter)),
        b'w' => return Some(Escape::Class(CharClass::WordChar)),
        b'Z' => return Some(Escape::Class(CharClass::Eof)),
        _ => return None,
    };
    Some(Escape::Byte(byte))
}

/// An open `(...)` sub-expression.
struct GroupFrame {
    /// The Group node, or ROOT for a synthetic top-level alternation.
    head: NodeId,
    synthetic: bool,
    /// Nodes the head was attached beneath; where zero occurrences of a
    /// starred group resume.
    entry_points: Vec<NodeId>,
    /// Completed alternative tails, filled in at `|` and `)`.
    tails: Vec<NodeId>,
}

/// A just-closed group, kept around so an immediately following `*` can
/// convert the whole sub-expression into a repeat.
struct ClosedGroup {
    head: NodeId,
    entry_points: Vec<NodeId>,
    tails: Vec<NodeId>,
}

struct Builder<'a> {
    graph: Graph,
    reader: Reader<'a>,
    cursor: NodeId,
    /// Parent of the cursor in the tree sense; the Kleene-star sibling
    /// search needs it.
    cursor_parent: NodeId,
    /// Alternation join points: the next attached node also becomes a
    /// child of each of these.
    pending_joins: Vec<NodeId>,
    groups: Vec<GroupFrame>,
    just_closed: Option<ClosedGroup>,
    escaped: bool,
    in_list: bool,
    list: CharacterList,
}

impl<'a> Builder<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            graph: Graph::new(),
            reader: Reader::new(input),
            cursor: ROOT,
            cursor_parent: ROOT,
            pending_joins: Vec::new(),
            groups: Vec::new(),
            just_closed: None,
            escaped: false,
            in_list: false,
            list: CharacterList::new(),
        }
    }

    fn err_pos(&self) -> (usize, usize) {
        (self.reader.line(), self.reader.col())
    }

    fn at_rule_start(&self) -> bool {
        self.cursor == ROOT
            && self.groups.is_empty()
            && self.pending_joins.is_empty()
            && !self.in_list
            && !self.escaped
    }

    fn run(mut self) -> Result<Graph, Error> {
        while let Some(ch) = self.reader.next() {
            // Token/action separator: tab anywhere, space outside a list.
            if ch == b'\t' || (ch == b' ' && !self.in_list) {
                if self.at_rule_start() {
                    // Indentation before the pattern.
                    continue;
                }
                self.finish_rule()?;
                continue;
            }

            if ch == b'\n' || ch == 0 {
                if self.at_rule_start() {
                    continue; // blank line
                }
                let (line, col) = self.err_pos();
                return Err(Error::NoActionGivenForToken { line, col });
            }

            let matcher = if self.escaped {
                self.escaped = false;
                let (line, col) = self.err_pos();
                match resolve_escape(ch) {
                    Some(Escape::Byte(b)) => Matcher::Char(b),
                    Some(Escape::Class(c)) => Matcher::Class(c),
                    None => {
                        return Err(Error::UnknownEscapeSequence {
                            found: ch as char,
                            line,
                            col,
                        });
                    }
                }
            } else {
                match ch {
                    b'\\' => {
                        self.escaped = true;
                        continue;
                    }
                    b'[' => {
                        self.open_list()?;
                        continue;
                    }
                    b']' => self.close_list()?,
                    b'^' => {
                        self.invert_list()?;
                        continue;
                    }
                    b'.' => {
                        if self.in_list {
                            let (line, col) = self.err_pos();
                            return Err(Error::DotInsideList { line, col });
                        }
                        Matcher::Any
                    }
                    b'*' => {
                        self.kleene_star()?;
                        continue;
                    }
                    b'+' => {
                        self.kleene_plus()?;
                        continue;
                    }
                    b'(' => {
                        self.open_group();
                        continue;
                    }
                    b'|' => {
                        self.alternate();
                        continue;
                    }
                    b')' => {
                        self.close_group()?;
                        continue;
                    }
                    other => Matcher::Char(other),
                }
            };

            if self.in_list {
                self.list.append(matcher);
                continue;
            }

            self.attach(matcher);
        }

        // End of the rule set.
        if self.in_list {
            let (line, col) = self.err_pos();
            return Err(Error::ListNotClosed { line, col });
        }
        if !self.at_rule_start() {
            let (line, col) = self.err_pos();
            return Err(Error::NoActionGivenForToken { line, col });
        }
        Ok(self.graph)
    }

    /// Capture the action text and attach the Action node, then reset the
    /// build cursor for the next rule.
    fn finish_rule(&mut self) -> Result<(), Error> {
        if self.groups.iter().any(|f| !f.synthetic) {
            let (line, col) = self.err_pos();
            return Err(Error::GroupNotClosed { line, col });
        }

        self.reader.shift();
        while let Some(ch) = self.reader.next() {
            if ch == b'\n' {
                break;
            }
        }
        let action = self
            .reader
            .marked()
            .trim_start_matches([' ', '\t'])
            .trim_end_matches('\n')
            .to_string();

        // Fold synthetic top-level alternation tails into the join set so
        // every alternative reaches the same action node.
        for frame in self.groups.drain(..) {
            self.pending_joins.extend(frame.tails);
        }

        let anode = self.graph.alloc(NodeKind::Action(action));
        // Prepend so the action precedes longer continuations.
        self.graph[self.cursor].children.insert(0, anode);
        let joins = std::mem::take(&mut self.pending_joins);
        for join in joins {
            if join != self.cursor && !self.graph[join].children.contains(&anode) {
                self.graph[join].children.push(anode);
            }
        }
        self.graph.actions.push(anode);

        self.cursor = ROOT;
        self.cursor_parent = ROOT;
        self.just_closed = None;
        self.escaped = false;
        Ok(())
    }

    fn open_list(&mut self) -> Result<(), Error> {
        if self.in_list {
            let (line, col) = self.err_pos();
            return Err(Error::ListInsideList { line, col });
        }
        self.in_list = true;
        self.list = CharacterList::new();
        Ok(())
    }

    fn close_list(&mut self) -> Result<Matcher, Error> {
        if !self.in_list {
            let (line, col) = self.err_pos();
            return Err(Error::ClosingListNeverOpened { line, col });
        }
        self.in_list = false;
        Ok(Matcher::List(std::mem::take(&mut self.list)))
    }

    fn invert_list(&mut self) -> Result<(), Error> {
        if !self.in_list {
            let (line, col) = self.err_pos();
            return Err(Error::InvertingListNeverOpened { line, col });
        }
        self.list.invert();
        Ok(())
    }

    /// Attach a matching node under the cursor, merging with an existing
    /// child when the matcher content is identical and the child is not a
    /// repeat node.
    fn attach(&mut self, matcher: Matcher) {
        self.just_closed = None;

        let found = self.graph[self.cursor]
            .children
            .iter()
            .copied()
            .find(|&c| self.graph[c].matcher() == Some(&matcher) && !self.graph.is_self_repeat(c));

        let node = match found {
            Some(existing) => existing,
            None => {
                let node = self.graph.alloc(NodeKind::Match(matcher));
                self.graph[self.cursor].children.push(node);
                node
            }
        };

        let joins = std::mem::take(&mut self.pending_joins);
        for join in joins {
            if join != self.cursor && !self.graph[join].children.contains(&node) {
                self.graph[join].children.push(node);
            }
        }

        self.cursor_parent = self.cursor;
        self.cursor = node;
    }

    /// `*` on the preceding unit (or on a just-closed group).
    fn kleene_star(&mut self) -> Result<(), Error> {
        if let Some(group) = self.just_closed.take() {
            return self.star_group(group);
        }

        if self.cursor == ROOT || self.graph[self.cursor].is_group() {
            let (line, col) = self.err_pos();
            return Err(Error::KleeneStarWithoutPrecedingUnit { line, col });
        }

        if self.graph[self.cursor].children.is_empty() {
            // The unit has no continuation yet; repeat it in place.
            self.graph.make_self_repeat(self.cursor);
            return Ok(());
        }

        // The unit already continues into other rules. Reuse a repeat
        // sibling with the same content, or clone one in, so the
        // non-repeating original stays intact.
        let matcher = self.graph[self.cursor]
            .matcher()
            .cloned()
            .expect("kleene star target is a match node");

        let sibling = self.graph[self.cursor_parent]
            .children
            .iter()
            .copied()
            .find(|&c| {
                c != self.cursor
                    && self.graph[c].matcher() == Some(&matcher)
                    && self.graph.is_self_repeat(c)
            });

        if let Some(repeat) = sibling {
            self.cursor = repeat;
            return Ok(());
        }

        let clone = self.graph.alloc(NodeKind::Match(matcher));
        self.graph.make_self_repeat(clone);
        let at = self.graph[self.cursor_parent]
            .children
            .iter()
            .position(|&c| c == self.cursor)
            .expect("cursor is a child of its parent");
        self.graph[self.cursor_parent].children.insert(at + 1, clone);
        self.cursor = clone;
        Ok(())
    }

    /// `*` applied to a whole `(...)`: the head becomes a repeat, every
    /// branch tail loops back into it, and the group's entry points join
    /// the pending set so a following atom also attaches where zero
    /// occurrences resume.
    fn star_group(&mut self, group: ClosedGroup) -> Result<(), Error> {
        self.graph.make_self_repeat(group.head);
        for &tail in &group.tails {
            if tail != group.head {
                self.graph.add_repeat_edge(tail, group.head);
            }
        }
        for entry in group.entry_points {
            if !self.pending_joins.contains(&entry) {
                self.pending_joins.push(entry);
            }
        }
        Ok(())
    }

    /// `+`: one mandatory occurrence, then zero-or-more via a repeating
    /// clone attached as the unit's child.
    fn kleene_plus(&mut self) -> Result<(), Error> {
        if self.just_closed.take().is_some() {
            let (line, col) = self.err_pos();
            return Err(Error::KleenePlusUnsupportedOnGroup { line, col });
        }
        if self.cursor == ROOT || self.graph[self.cursor].is_group() {
            let (line, col) = self.err_pos();
            return Err(Error::KleenePlusWithoutPrecedingUnit { line, col });
        }

        let matcher = self.graph[self.cursor]
            .matcher()
            .cloned()
            .expect("kleene plus target is a match node");
        let clone = self.graph.alloc(NodeKind::Match(matcher));
        self.graph.make_self_repeat(clone);
        self.graph[self.cursor].children.insert(0, clone);
        self.cursor_parent = self.cursor;
        self.cursor = clone;
        Ok(())
    }

    /// `(`: a transparent Group child of the cursor; alternatives inside
    /// branch from it.
    fn open_group(&mut self) {
        self.just_closed = None;
        let head = self.graph.alloc(NodeKind::Group);
        self.graph[self.cursor].children.push(head);
        let mut entry_points = vec![self.cursor];
        let joins = std::mem::take(&mut self.pending_joins);
        for join in joins {
            if join != self.cursor {
                self.graph[join].children.push(head);
                entry_points.push(join);
            }
        }
        self.groups.push(GroupFrame {
            head,
            synthetic: false,
            entry_points,
            tails: Vec::new(),
        });
        self.cursor_parent = self.cursor;
        self.cursor = head;
    }

    /// `|`: back up to the sub-expression head; the finished branch's tail
    /// is remembered for joining at `)` (or at rule end for a top-level
    /// alternation).
    fn alternate(&mut self) {
        self.just_closed = None;
        if self.groups.is_empty() {
            self.groups.push(GroupFrame {
                head: ROOT,
                synthetic: true,
                entry_points: vec![ROOT],
                tails: Vec::new(),
            });
        }
        let cursor = self.cursor;
        let joins = std::mem::take(&mut self.pending_joins);
        let frame = self.groups.last_mut().expect("frame just ensured");
        frame.tails.push(cursor);
        frame.tails.extend(joins);
        self.cursor = frame.head;
        self.cursor_parent = ROOT;
    }

    /// `)`: close the sub-expression. The other branches' tails become
    /// pending joins so whatever follows branches from all of them.
    fn close_group(&mut self) -> Result<(), Error> {
        let frame = match self.groups.pop() {
            Some(frame) if !frame.synthetic => frame,
            _ => {
                let (line, col) = self.err_pos();
                return Err(Error::GroupNeverOpened { line, col });
            }
        };
        let mut tails = frame.tails;
        tails.push(self.cursor);
        tails.extend(std::mem::take(&mut self.pending_joins));

        self.cursor = *tails.last().expect("at least the current branch tail");
        self.cursor_parent = frame.head;
        for &tail in &tails[..tails.len() - 1] {
            if !self.pending_joins.contains(&tail) {
                self.pending_joins.push(tail);
            }
        }
        self.just_closed = Some(ClosedGroup {
            head: frame.head,
            entry_points: frame.entry_points,
            tails,
        });
        Ok(())
    }
}
