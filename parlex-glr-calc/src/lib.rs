//! # parlex-glr-calc
//!
//! A small demonstration crate built on **parlex-glr**: an arithmetic
//! calculator whose grammar is deliberately ambiguous.
//!
//! ## Overview
//!
//! - [`lexer`]: converts source text into [`CalcToken`]s annotated with
//!   [`Span`](parlex_glr::Span)s.
//! - [`parser`]: the hand-written GLR table, the semantic actions, and
//!   [`CalcParser`], which runs the engine over one input.
//! - [`token`]: token classes ([`TokenID`]), payloads ([`TokenValue`]) and
//!   [`CalcToken`].
//! - [`error`]: [`CalcError`].
//!
//! ## Example
//!
//! ```rust
//! use parlex_glr_calc::{CalcParser, Grouping};
//!
//! let parser = CalcParser::new(Grouping::Ambiguous);
//!
//! let eval = parser.evaluate("2 * (3 + 4)").unwrap();
//! assert_eq!(eval.expr.text, "(2*(3+4))");
//! assert_eq!(eval.expr.value, Some(14));
//!
//! // the missing operand is inserted and reported
//! let eval = parser.evaluate("2 * ").unwrap();
//! assert_eq!(eval.expr.text, "(2*?)");
//! assert_eq!(eval.diagnostics.len(), 1);
//! ```
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::CalcError;
pub use lexer::{CalcLexer, tokenize};
pub use parser::{
    CalcEngine, CalcParser, Evaluation, Expr, Grouping, ProdID, calc_reducer, calc_table,
};
pub use token::{CalcToken, TokenID, TokenValue};
