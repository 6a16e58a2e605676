//! Error taxonomy for rule-file compilation.
//!
//! Every variant is fatal to the current compilation: one malformed rule
//! aborts the whole file and no output is produced. Internal errors are a
//! separate class; they indicate a builder bug, not bad user input.

/// Errors surfaced while compiling a rule file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("closing a list that was never open at line {line}, column {col}")]
    ClosingListNeverOpened { line: usize, col: usize },

    #[error("dot wildcard is not permitted inside lists at line {line}, column {col}")]
    DotInsideList { line: usize, col: usize },

    #[error("inverting a list that was never open at line {line}, column {col}")]
    InvertingListNeverOpened { line: usize, col: usize },

    #[error("Kleene plus without any preceding unit at line {line}, column {col}")]
    KleenePlusWithoutPrecedingUnit { line: usize, col: usize },

    #[error("Kleene star without any preceding unit at line {line}, column {col}")]
    KleeneStarWithoutPrecedingUnit { line: usize, col: usize },

    #[error("Kleene plus cannot apply to a group at line {line}, column {col}")]
    KleenePlusUnsupportedOnGroup { line: usize, col: usize },

    #[error("list inside list at line {line}, column {col}")]
    ListInsideList { line: usize, col: usize },

    #[error("list opened but not closed at line {line}, column {col}")]
    ListNotClosed { line: usize, col: usize },

    #[error("closing a group that was never open at line {line}, column {col}")]
    GroupNeverOpened { line: usize, col: usize },

    #[error("group opened but not closed at line {line}, column {col}")]
    GroupNotClosed { line: usize, col: usize },

    #[error("no action given for a token at line {line}, column {col}")]
    NoActionGivenForToken { line: usize, col: usize },

    #[error("unknown escape sequence '\\{found}' at line {line}, column {col}")]
    UnknownEscapeSequence { found: char, line: usize, col: usize },

    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

/// Internal-consistency failures detected after construction.
///
/// These never trigger on well-formed builds; hitting one means the
/// builder or a graph pass produced a malformed graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("node {0} reached emission without an assigned ID")]
    UnassignedNodeId(usize),

    #[error("node {0} carries a dangling repeat reference")]
    DanglingRepeat(usize),
}
