//! # parlex-glr
//!
//! A table-driven Generalized-LR parsing engine with in-line error recovery.
//!
//! The [`ParserEngine`] is fed one classified [`Token`] at a time and runs a
//! precomputed [`TransitionTable`]. Where the table allows more than one
//! action it forks the current parse head; equivalent heads are merged after
//! every token by the [`HeadCleaner`]. All heads share one graph-structured
//! stack ([`Gss`]).
//!
//! When no head can consume a token, the engine repairs the input by
//! deleting the token or inserting a synthesized one, and records an
//! [`ErrorRecord`] on the repaired head. Errors reach the caller through an
//! [`ErrorSink`] when a result is retrieved with
//! [`ParserEngine::get_result`].
//!
//! The [`combinator`] module provides a separate, local two-way
//! disambiguation mechanism for hand-written parsers.

mod cleaner;
pub mod combinator;
mod diagnostics;
mod engine;
mod error;
mod head;
mod recovery;
mod reduce;
mod stack;
mod table;
mod token;

#[cfg(test)]
mod test_table_data;

pub use crate::cleaner::HeadCleaner;
pub use crate::diagnostics::{
    Diagnostic, Diagnostics, ErrorId, ErrorRecord, ErrorSink, SyntaxErrorKind, SyntaxErrors,
};
pub use crate::engine::{EngineStats, ParserEngine};
pub use crate::error::{GlrError, Position, Span};
pub use crate::head::ParserHead;
pub use crate::reduce::{ReduceTable, Reducer, SemanticAction};
pub use crate::stack::{Gss, NodeId, StackNode, StackValue};
pub use crate::table::{ParseTable, Production, TransitionTable};
pub use crate::token::Token;
