//! The matcher seam between compiled rules and the pattern engine.

use std::fmt;

/// Where and how strongly a matcher fired on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Byte offset of the matched token in the candidate.
    pub start: usize,
    /// Byte offset one past the matched token.
    pub end: usize,
    /// False when the token was only matched by a generic numeric fragment.
    pub exact: bool,
}

impl Anchor {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Precedence key: longer matched text first, exact before generic.
    pub fn strength(&self) -> (usize, bool) {
        (self.len(), self.exact)
    }

    /// The matched token text.
    pub fn text<'a>(&self, candidate: &'a str) -> &'a str {
        candidate.get(self.start..self.end).unwrap_or("")
    }
}

/// A pure predicate over candidate strings.
///
/// Implementations must be total: any `&str`, including the empty string
/// and arbitrary unicode, yields an answer without panicking.
pub trait Matcher: Send + Sync + fmt::Debug {
    fn test(&self, candidate: &str) -> bool;

    /// The strongest token occurrence, if the matcher fires. Matchers with
    /// no notion of a token may return `None` even when `test` is true.
    fn anchor(&self, _candidate: &str) -> Option<Anchor> {
        None
    }
}
