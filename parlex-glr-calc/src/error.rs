//! # Calculator Error Type
//!
//! [`CalcError`] aggregates the failures of the calculator pipeline: reading
//! numeric literals, characters the tokenizer does not know, building or
//! running the lexer DFA, and engine faults. Syntax errors in the expression are not `CalcError`s; they are
//! repaired by the engine and reported as diagnostics.
use parlex_glr::{GlrError, Position};
use thiserror::Error;

/// Represents all possible errors that can occur within the calculator.
///
/// # Examples
/// ```rust
/// # use parlex_glr_calc::CalcError;
/// # fn demo(s: &str) -> Result<i64, CalcError> {
/// let n: i64 = s.parse()?; // ParseIntError -> CalcError via #[from]
/// # Ok(n) }
/// assert!(demo("x").is_err());
/// ```
#[derive(Debug, Error)]
pub enum CalcError {
    /// An integer literal could not be parsed, typically because it overflows
    /// `i64`.
    #[error("unable to parse {0:?}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// The tokenizer met a character outside the calculator's alphabet.
    #[error("unexpected character {ch:?} at {}:{}", .position.line, .position.column)]
    UnexpectedChar { ch: char, position: Position },

    /// The lexer DFA could not be built from its rules.
    #[error("lexer DFA: {0}")]
    Dfa(#[from] regex_automata::dfa::dense::BuildError),

    /// The lexer DFA refused to search the input.
    #[error("lexer match: {0}")]
    Match(#[from] regex_automata::MatchError),

    /// The engine rejected its table or was misused.
    #[error("engine error: {0}")]
    Engine(#[from] GlrError),

    /// Error recovery could not produce any parse.
    #[error("no parse")]
    NoParse,
}
