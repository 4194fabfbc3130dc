//! Source locations and engine errors.
//!
//! This module defines the small location types attached to tokens and
//! diagnostics ([`Position`], [`Span`]), the `span!` helper macro, and
//! [`GlrError`], the error type returned by fallible engine operations.
//!
//! Note that ordinary syntax errors are *not* reported through [`GlrError`].
//! The engine records them on the parse heads as
//! [`ErrorRecord`](crate::ErrorRecord)s and surfaces them only when a result
//! is retrieved. [`GlrError`] is reserved for misuse of the engine and for
//! malformed transition tables.
//!
//! # Examples
//!
//! ```rust
//! # use parlex_glr::{Position, Span, span};
//! let sp = Span::new(Position::new(3, 5), Position::new(3, 10));
//! assert!(!sp.is_empty());
//! assert_eq!(sp.line_range(), (3, 3));
//!
//! let sp_opt = span!(1, 1, 1, 5);
//! assert!(sp_opt.is_some());
//! ```

use thiserror::Error;

/// A 0-based line/column position in source text.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open source range: `[start, end)`.
///
/// Invariants are not enforced here, but it is conventional for `start <= end`
/// in lexicographic `(line, column)` ordering.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Merge with another span by covering both.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Is this span empty (start == end)?
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the inclusive line range spanned by this `Span`.
    #[inline]
    pub fn line_range(&self) -> (usize, usize) {
        (self.start.line, self.end.line)
    }

    /// Pretty-print for diagnostics (human-readable).
    #[inline]
    pub fn display(&self) -> String {
        format!(
            "span {}:{} to {}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Errors returned by the GLR engine.
///
/// These are caller-programming faults or table defects. Syntax errors in the
/// parsed input never produce a `GlrError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlrError {
    /// [`ParserEngine::get_result`](crate::ParserEngine::get_result) was
    /// called with an index outside `0..accepted_count()`.
    #[error("result index {index} is out of range (accepted: {len})")]
    ResultIndexOutOfRange { index: usize, len: usize },

    /// The table has no goto entry for a nonterminal uncovered by a reduction.
    #[error("no goto from state {state} on nonterminal {lhs}")]
    MissingGoto { state: usize, lhs: usize },

    /// The table referenced a production it does not define.
    #[error("unknown production {prod_id}")]
    UnknownProduction { prod_id: usize },

    /// A reduction asked for more values than the stack holds.
    #[error("stack underflow while reducing {arity} values")]
    StackUnderflow { arity: usize },

    /// A stack handle was used after its node had been reclaimed.
    #[error("stack node {node} was reclaimed")]
    StaleNode { node: usize },

    /// The accepted head at `index` does not carry a reduced value.
    #[error("accepted head {index} has no reduced value")]
    MissingResult { index: usize },
}

/// Build an `Option<Span>` inline from 0-based line/column coordinates.
///
/// # Examples
///
/// ```rust
/// # use parlex_glr::span;
/// let s = span!(0, 0, 1, 4);
/// assert_eq!(s.unwrap().end.column, 4);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        Some($crate::Span {
            start: $crate::Position {
                line: $line_start,
                column: $col_start,
            },
            end: $crate::Position {
                line: $line_end,
                column: $col_end,
            },
        })
    };
}
