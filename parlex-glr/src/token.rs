use crate::Span;
use smartstring::alias::String;
use std::fmt::Debug;

/// A classified input unit consumed by the [`ParserEngine`](crate::ParserEngine).
///
/// A token has a *primary* class (`token_id`) and may be classified
/// differently under an alternate lexical channel. The transition table
/// names the channel to use per state (see
/// [`TransitionTable::lexer_for_shift`](crate::TransitionTable::lexer_for_shift)),
/// which lets a word be a keyword in some states and an identifier in others.
///
/// Tokens are pushed onto the parse stack on shift, so they are cloned once
/// per shifting head. Keep them small.
pub trait Token: Clone + Debug {
    /// Primary token class.
    fn token_id(&self) -> usize;

    /// Class of this token under lexical channel `lexer`.
    ///
    /// Defaults to the primary class.
    fn token_id_in(&self, lexer: usize) -> usize {
        let _ = lexer;
        self.token_id()
    }

    /// Literal text of the token, used as the argument of
    /// "unexpected token" diagnostics.
    fn literal(&self) -> String;

    fn span(&self) -> Option<Span>;

    fn is_end_of_stream(&self) -> bool;

    /// Synthesizes a corrective token of class `token_id`, positioned at
    /// this token. `description` is the table's human-readable name for the
    /// class.
    fn correction(&self, token_id: usize, description: &str) -> Self;
}
