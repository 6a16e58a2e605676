//! Character matchers and `[...]` lists.
//!
//! A matcher is a predicate over one input byte (`None` = end of input).
//! Lists are ordered sequences of matchers with optional inversion. List
//! equality is order-sensitive: `[ab]` and `[ba]` are distinct for
//! prefix-merging purposes.

use std::fmt;

/// Named single-character classes reachable through escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `\d` - ASCII digit.
    Digit,
    /// `\l` - ASCII letter.
    Letter,
    /// `\w` - ASCII letter, digit, or underscore.
    WordChar,
    /// `\Z` - end of input.
    Eof,
}

impl CharClass {
    pub fn matches(self, ch: Option<u8>) -> bool {
        match self {
            CharClass::Digit => matches!(ch, Some(c) if c.is_ascii_digit()),
            CharClass::Letter => matches!(ch, Some(c) if c.is_ascii_alphabetic()),
            CharClass::WordChar => {
                matches!(ch, Some(c) if c.is_ascii_alphanumeric() || c == b'_')
            }
            CharClass::Eof => ch.is_none(),
        }
    }

    /// Render as a Rust boolean expression over `var: Option<u8>`.
    pub fn to_cond(self, var: &str) -> String {
        match self {
            CharClass::Digit => format!("matches!({var}, Some(b'0'..=b'9'))"),
            CharClass::Letter => {
                format!("matches!({var}, Some(b'a'..=b'z') | Some(b'A'..=b'Z'))")
            }
            CharClass::WordChar => format!(
                "matches!({var}, Some(b'a'..=b'z') | Some(b'A'..=b'Z') | Some(b'0'..=b'9') | Some(b'_'))"
            ),
            CharClass::Eof => format!("{var}.is_none()"),
        }
    }
}

/// Predicate over one input byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// A single literal byte.
    Char(u8),
    /// A named class.
    Class(CharClass),
    /// `.` - any byte (but not end of input).
    Any,
    /// `[...]` list.
    List(CharacterList),
}

impl Matcher {
    pub fn matches(&self, ch: Option<u8>) -> bool {
        match self {
            Matcher::Char(c) => ch == Some(*c),
            Matcher::Class(class) => class.matches(ch),
            Matcher::Any => ch.is_some(),
            Matcher::List(list) => list.matches(ch),
        }
    }

    /// Render as a Rust boolean expression over `var: Option<u8>`.
    pub fn to_cond(&self, var: &str) -> String {
        match self {
            Matcher::Char(c) => format!("{var} == Some({})", byte_literal(*c)),
            Matcher::Class(class) => class.to_cond(var),
            Matcher::Any => format!("{var}.is_some()"),
            Matcher::List(list) => list.to_cond(var),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Char(c) if c.is_ascii_graphic() => write!(f, "'{}'", *c as char),
            Matcher::Char(c) => write!(f, "0x{c:02x}"),
            Matcher::Class(class) => write!(f, "{class:?}"),
            Matcher::Any => write!(f, "ANY"),
            Matcher::List(list) => {
                write!(f, "[{}", if list.inverted() { "^" } else { "" })?;
                for (i, m) in list.items().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{m}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// An ordered `[...]` list of matchers, optionally inverted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterList {
    items: Vec<Matcher>,
    inverted: bool,
}

impl CharacterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, matcher: Matcher) {
        self.items.push(matcher);
    }

    pub fn invert(&mut self) {
        self.inverted = true;
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn items(&self) -> &[Matcher] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Membership is an OR over the elements, NOT-OR when inverted.
    /// An inverted list never matches end of input.
    pub fn matches(&self, ch: Option<u8>) -> bool {
        let hit = self.items.iter().any(|m| m.matches(ch));
        if self.inverted { ch.is_some() && !hit } else { hit }
    }

    /// Render as a Rust boolean expression over `var: Option<u8>`.
    pub fn to_cond(&self, var: &str) -> String {
        let inner = self
            .items
            .iter()
            .map(|m| m.to_cond(var))
            .collect::<Vec<_>>()
            .join(" || ");
        if self.inverted {
            format!("({var}.is_some() && !({inner}))")
        } else {
            format!("({inner})")
        }
    }
}

/// Render a byte as a Rust literal usable inside emitted conditions.
pub(crate) fn byte_literal(b: u8) -> String {
    match b {
        b'\n' => "b'\\n'".to_string(),
        b'\r' => "b'\\r'".to_string(),
        b'\t' => "b'\\t'".to_string(),
        b'\\' => "b'\\\\'".to_string(),
        b'\'' => "b'\\''".to_string(),
        b if b.is_ascii_graphic() || b == b' ' => format!("b'{}'", b as char),
        b => format!("0x{b:02x}"),
    }
}
