//! # Syntax Diagnostics
//!
//! Syntax errors found while parsing are recorded on the parse head that
//! repaired them, as a sequence of [`ErrorRecord`]s. They are handed to the
//! caller only when a result is retrieved, through an [`ErrorSink`]. The
//! numeric codes used for each kind come from a [`SyntaxErrors`]
//! configuration value supplied when the engine is constructed.

use crate::Span;
use smartstring::alias::String;

/// Caller-defined error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorId(pub u32);

/// The kinds of syntax error the engine records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// An extra input token was discarded.
    TokenUnexpected,
    /// An expected token was synthesized and inserted.
    TokenMissing,
    /// Anything else.
    Other,
}

/// Maps each [`SyntaxErrorKind`] to the caller's [`ErrorId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxErrors {
    pub token_unexpected: ErrorId,
    pub token_missing: ErrorId,
    pub other: ErrorId,
}

impl Default for SyntaxErrors {
    fn default() -> Self {
        Self {
            token_unexpected: ErrorId(1),
            token_missing: ErrorId(2),
            other: ErrorId(0),
        }
    }
}

impl SyntaxErrors {
    /// Error code for `kind`, falling back to `other` when no kind was set.
    pub fn id_of(&self, kind: Option<SyntaxErrorKind>) -> ErrorId {
        match kind {
            Some(SyntaxErrorKind::TokenUnexpected) => self.token_unexpected,
            Some(SyntaxErrorKind::TokenMissing) => self.token_missing,
            Some(SyntaxErrorKind::Other) | None => self.other,
        }
    }
}

/// One syntax error recorded on a parse head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: Option<SyntaxErrorKind>,
    pub span: Option<Span>,
    /// The discarded token's literal, or the description of the inserted
    /// token class.
    pub argument: Option<String>,
}

impl ErrorRecord {
    pub fn new(kind: SyntaxErrorKind, span: Option<Span>, argument: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            span,
            argument: Some(argument.into()),
        }
    }
}

/// Receives the errors of a retrieved result.
pub trait ErrorSink {
    fn add_error(&mut self, id: ErrorId, span: Option<Span>, argument: Option<&str>);
}

/// Discards every error.
impl ErrorSink for () {
    fn add_error(&mut self, _id: ErrorId, _span: Option<Span>, _argument: Option<&str>) {}
}

/// An error delivered to [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: ErrorId,
    pub span: Option<Span>,
    pub argument: Option<String>,
}

/// An [`ErrorSink`] that keeps every error in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.errors.iter()
    }
}

impl ErrorSink for Diagnostics {
    fn add_error(&mut self, id: ErrorId, span: Option<Span>, argument: Option<&str>) {
        self.errors.push(Diagnostic {
            id,
            span,
            argument: argument.map(String::from),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span;

    #[test]
    fn unset_kind_maps_to_other() {
        let config = SyntaxErrors {
            token_unexpected: ErrorId(10),
            token_missing: ErrorId(11),
            other: ErrorId(99),
        };
        assert_eq!(config.id_of(None), ErrorId(99));
        assert_eq!(config.id_of(Some(SyntaxErrorKind::Other)), ErrorId(99));
        assert_eq!(
            config.id_of(Some(SyntaxErrorKind::TokenMissing)),
            ErrorId(11)
        );
        assert_eq!(
            config.id_of(Some(SyntaxErrorKind::TokenUnexpected)),
            ErrorId(10)
        );
    }

    #[test]
    fn diagnostics_keep_order() {
        let mut diags = Diagnostics::new();
        diags.add_error(ErrorId(1), span!(0, 0, 0, 1), Some("x"));
        diags.add_error(ErrorId(2), None, None);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.errors[0].argument.as_deref(), Some("x"));
        assert_eq!(diags.errors[1].id, ErrorId(2));
    }
}
