//! Positions in header text, used by scan diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a token or declaration starts, and how many bytes it covers.
///
/// Lines and columns are 1-indexed; columns count bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Column just past the last covered byte.
    #[inline]
    pub fn end_col(self) -> u32 {
        self.col + self.len
    }

    /// Span from the start of `self` to the end of `end`.
    ///
    /// A declaration can continue over several lines; then only the start
    /// position is meaningful and the lengths are added.
    pub fn through(self, end: Span) -> Span {
        if self.line != end.line {
            return Span::new(self.line, self.col, self.len + end.len);
        }
        let col = self.col.min(end.col);
        Span::new(self.line, col, self.end_col().max(end.end_col()) - col)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}
