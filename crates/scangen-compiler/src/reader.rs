//! Pull-based character reader over a rule file.
//!
//! The builder consumes the rule text one byte at a time. The reader keeps
//! a mark so action text can be captured verbatim once the token/action
//! separator is found, and tracks line/column for error reporting.

/// Character-stream reader with mark support.
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    mark: usize,
    line: usize,
    col: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            mark: 0,
            line: 1,
            col: 0,
        }
    }

    /// Read the next byte, or `None` at end of input.
    pub fn next(&mut self) -> Option<u8> {
        let ch = *self.input.get(self.pos)?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Set the mark at the current position, discarding the consumed prefix.
    pub fn shift(&mut self) {
        self.mark = self.pos;
    }

    /// The text between the mark and the current position.
    pub fn marked(&self) -> &'a str {
        // The reader is only ever constructed from &str, so this slice is
        // valid UTF-8 as long as marks land on byte boundaries, which they
        // do for ASCII rule syntax.
        std::str::from_utf8(&self.input[self.mark..self.pos]).unwrap_or_default()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// 1-based line of the last byte read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the last byte read.
    pub fn col(&self) -> usize {
        self.col.max(1)
    }
}
