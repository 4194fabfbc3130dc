//! # Calculator Lexer
//!
//! [`CalcLexer`] turns source text into [`CalcToken`]s. It recognizes decimal
//! integer literals, `+`, `*`, `(` and `)`, skips whitespace and `#` line
//! comments, and finishes with a single [`TokenID::End`] token positioned
//! after the last character. The rules are matched by a `regex-automata`
//! dense DFA built when the lexer is created.
//!
//! Positions are 0-based lines and columns; a token's span ends one column
//! past its last character.
use crate::{CalcError, CalcToken, TokenID, TokenValue};
use parlex_glr::{Position, Span};
use regex_automata::{
    Anchored, HalfMatch, Input, MatchKind,
    dfa::{Automaton, StartKind, dense},
};

/// Lexer rules, in pattern order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerRule {
    Space,
    Comment,
    Number,
    Punct(TokenID),
}

const RULES: [(LexerRule, &str); 7] = [
    (LexerRule::Space, r"[ \t\r\n]+"),
    (LexerRule::Comment, r"#[^\n]*"),
    (LexerRule::Number, r"[0-9]+"),
    (LexerRule::Punct(TokenID::Plus), r"\+"),
    (LexerRule::Punct(TokenID::Star), r"\*"),
    (LexerRule::Punct(TokenID::LeftParen), r"\("),
    (LexerRule::Punct(TokenID::RightParen), r"\)"),
];

/// Tokenizer over a string slice.
///
/// The rules are compiled into one anchored dense DFA; at each offset the
/// longest match wins.
///
/// # Example
/// ```rust
/// # use parlex_glr_calc::{CalcLexer, TokenID};
/// let ids: Vec<TokenID> = CalcLexer::try_new("(1 + 22)")
///     .unwrap()
///     .map(|t| t.unwrap().token_id)
///     .collect();
/// assert_eq!(
///     ids,
///     [
///         TokenID::LeftParen,
///         TokenID::Number,
///         TokenID::Plus,
///         TokenID::Number,
///         TokenID::RightParen,
///         TokenID::End,
///     ]
/// );
/// ```
pub struct CalcLexer<'a> {
    dfa: dense::DFA<Vec<u32>>,
    source: &'a str,
    offset: usize,
    position: Position,
    done: bool,
}

impl<'a> CalcLexer<'a> {
    pub fn try_new(source: &'a str) -> Result<Self, CalcError> {
        let patterns: Vec<&str> = RULES.iter().map(|(_, re)| *re).collect();
        let dfa = dense::Builder::new()
            .configure(
                dense::DFA::config()
                    .match_kind(MatchKind::All)
                    .start_kind(StartKind::Anchored),
            )
            .build_many(patterns.as_slice())?;
        Ok(Self {
            dfa,
            source,
            offset: 0,
            position: Position::default(),
            done: false,
        })
    }

    /// Longest match at the current offset, as a rule and a byte length.
    fn try_match(&self) -> Result<Option<(LexerRule, usize)>, CalcError> {
        let bytes = &self.source.as_bytes()[self.offset..];
        let dfa = &self.dfa;
        let mut state = dfa.start_state_forward(&Input::new(bytes).anchored(Anchored::Yes))?;
        let mut last_match = None;

        for (i, &b) in bytes.iter().enumerate() {
            state = dfa.next_state(state, b);
            if dfa.is_special_state(state) {
                if dfa.is_match_state(state) {
                    last_match = Some(HalfMatch::new(dfa.match_pattern(state, 0), i));
                } else if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
                    log::trace!("DEAD: i={}, b={:?}", i, b as char);
                    return Ok(last_match.map(|m| (RULES[m.pattern().as_usize()].0, m.offset())));
                }
            }
        }
        state = dfa.next_eoi_state(state);
        if dfa.is_match_state(state) {
            last_match = Some(HalfMatch::new(dfa.match_pattern(state, 0), bytes.len()));
        }
        Ok(last_match.map(|m| (RULES[m.pattern().as_usize()].0, m.offset())))
    }

    /// Consumes `len` bytes, returning them and advancing the position.
    fn advance(&mut self, len: usize) -> &'a str {
        let text = &self.source[self.offset..self.offset + len];
        for ch in text.chars() {
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 0;
            } else {
                self.position.column += 1;
            }
        }
        self.offset += len;
        text
    }

    fn next_token(&mut self) -> Result<CalcToken, CalcError> {
        loop {
            let start = self.position;
            let rest = &self.source[self.offset..];
            let Some(ch) = rest.chars().next() else {
                self.done = true;
                return Ok(CalcToken {
                    token_id: TokenID::End,
                    value: TokenValue::None,
                    span: Some(Span::new(start, start)),
                });
            };
            let (rule, len) = match self.try_match()? {
                Some((rule, len)) if len > 0 => (rule, len),
                _ => {
                    return Err(CalcError::UnexpectedChar {
                        ch,
                        position: start,
                    });
                }
            };
            let text = self.advance(len);
            log::trace!("MATCHED: {:?} {:?}", rule, text);
            let (token_id, value) = match rule {
                LexerRule::Space | LexerRule::Comment => continue,
                LexerRule::Number => (TokenID::Number, TokenValue::Number(text.parse()?)),
                LexerRule::Punct(token_id) => (token_id, TokenValue::None),
            };
            return Ok(CalcToken {
                token_id,
                value,
                span: Some(Span::new(start, self.position)),
            });
        }
    }
}

impl Iterator for CalcLexer<'_> {
    type Item = Result<CalcToken, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.is_err() {
            self.done = true;
        }
        if let Ok(t) = &token {
            log::trace!("Token {:?} {:?}", t.token_id, t.value);
        }
        Some(token)
    }
}

/// Tokenizes all of `source`, including the final end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<CalcToken>, CalcError> {
    CalcLexer::try_new(source)?.collect()
}
