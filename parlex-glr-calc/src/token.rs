//! # Calculator Tokens
//!
//! This module defines the token classes and the concrete token type consumed
//! by the calculator's GLR engine:
//!
//! - [`TokenID`]: the token classes, numbered as in the transition table,
//! - [`TokenValue`]: the payload carried by a token,
//! - [`CalcToken`]: a concrete token implementing [`parlex_glr::Token`].
use parlex_glr::{Span, Token};
use smartstring::alias::String;

/// Token classes of the calculator grammar.
///
/// The discriminants are the class indices used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenID {
    Number = 0,
    Plus = 1,
    Star = 2,
    LeftParen = 3,
    RightParen = 4,
    End = 5,
}

impl TokenID {
    pub const COUNT: usize = 6;

    pub const ALL: [TokenID; Self::COUNT] = [
        TokenID::Number,
        TokenID::Plus,
        TokenID::Star,
        TokenID::LeftParen,
        TokenID::RightParen,
        TokenID::End,
    ];

    /// Descriptions used in "missing token" diagnostics, indexed by class.
    pub const DESCRIPTIONS: [&'static str; Self::COUNT] =
        ["number", "'+'", "'*'", "'('", "')'", "end of input"];

    /// Returns the class with index `index`.
    pub fn from_index(index: usize) -> Option<TokenID> {
        Self::ALL.get(index).copied()
    }

    /// Source text of a punctuation class.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenID::Number => "",
            TokenID::Plus => "+",
            TokenID::Star => "*",
            TokenID::LeftParen => "(",
            TokenID::RightParen => ")",
            TokenID::End => "",
        }
    }
}

impl From<TokenID> for usize {
    fn from(t: TokenID) -> Self {
        t as usize
    }
}

/// The payload carried by a lexical token.
///
/// # Example
/// ```rust
/// # use parlex_glr_calc::TokenValue;
/// let token = TokenValue::Number(42);
/// let TokenValue::Number(n) = token else {
///     panic!("Expected a numeric token");
/// };
/// assert_eq!(n, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// No associated data (operators, parentheses, end of input).
    None,

    /// Integer literal.
    Number(i64),

    /// Synthesized by error recovery; carries the class description.
    Missing(String),
}

/// A concrete lexical token for the calculator.
///
/// # Example
/// ```rust
/// # use parlex_glr_calc::{CalcToken, TokenID, TokenValue};
/// # use parlex_glr::{Token, span};
/// let tok = CalcToken {
///     token_id: TokenID::Number,
///     value: TokenValue::Number(99),
///     span: span!(0, 0, 0, 2),
/// };
///
/// assert_eq!(tok.token_id(), 0);
/// assert_eq!(tok.literal(), "99");
/// assert_eq!(tok.span(), span!(0, 0, 0, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalcToken {
    pub token_id: TokenID,
    pub value: TokenValue,
    pub span: Option<Span>,
}

impl Token for CalcToken {
    fn token_id(&self) -> usize {
        self.token_id.into()
    }

    fn literal(&self) -> String {
        match &self.value {
            TokenValue::Number(n) => n.to_string().into(),
            TokenValue::Missing(_) => String::new(),
            TokenValue::None => self.token_id.symbol().into(),
        }
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn is_end_of_stream(&self) -> bool {
        self.token_id == TokenID::End
    }

    fn correction(&self, token_id: usize, description: &str) -> Self {
        CalcToken {
            token_id: TokenID::from_index(token_id).unwrap_or(TokenID::End),
            value: TokenValue::Missing(description.into()),
            span: self.span,
        }
    }
}
