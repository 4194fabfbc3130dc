//! Small hand-built automata shared by the engine tests.

use crate::{ParseTable, ReduceTable, Span, StackValue, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct TestToken {
    pub token_id: usize,
    /// Class under lexical channel 1, if the word is a keyword.
    pub keyword_id: Option<usize>,
    pub text: std::string::String,
    pub span: Option<Span>,
    pub end_of_stream: bool,
}

impl TestToken {
    pub fn new(token_id: usize, text: &str, column: usize) -> Self {
        Self {
            token_id,
            keyword_id: None,
            text: text.to_string(),
            span: crate::span!(0, column, 0, column + text.len().max(1)),
            end_of_stream: false,
        }
    }

    pub fn keyword(mut self, keyword_id: usize) -> Self {
        self.keyword_id = Some(keyword_id);
        self
    }

    pub fn eos(token_id: usize, column: usize) -> Self {
        Self {
            end_of_stream: true,
            ..Self::new(token_id, "", column)
        }
    }
}

impl Token for TestToken {
    fn token_id(&self) -> usize {
        self.token_id
    }

    fn token_id_in(&self, lexer: usize) -> usize {
        match lexer {
            1 => self.keyword_id.unwrap_or(self.token_id),
            _ => self.token_id,
        }
    }

    fn literal(&self) -> smartstring::alias::String {
        self.text.as_str().into()
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    fn correction(&self, token_id: usize, description: &str) -> Self {
        Self {
            token_id,
            keyword_id: None,
            text: description.to_string(),
            span: self.span,
            end_of_stream: false,
        }
    }
}

pub type Value = std::string::String;

fn render(value: &StackValue<TestToken, Value>) -> Value {
    match value {
        StackValue::Lexeme(token) => token.text.clone(),
        StackValue::Reduced(value) => value.clone(),
    }
}

/// Joins the right-hand side with spaces.
fn concat(rhs: &[&StackValue<TestToken, Value>], _: &TestToken) -> Value {
    rhs.iter()
        .map(|v| render(v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn group(rhs: &[&StackValue<TestToken, Value>], lookahead: &TestToken) -> Value {
    format!("[{}]", concat(rhs, lookahead))
}

fn add(rhs: &[&StackValue<TestToken, Value>], _: &TestToken) -> Value {
    format!("({}+{})", render(rhs[0]), render(rhs[2]))
}

pub mod ab {
    //! `S' -> S ; S -> a b`
    use super::*;

    pub const A: usize = 0;
    pub const B: usize = 1;
    pub const X: usize = 2;
    pub const EOF: usize = 3;

    pub fn table() -> ParseTable {
        let mut table = ParseTable::new(["a", "b", "x", "end of input"], EOF);
        let start = table.add_start_production(1, 1);
        let s_ab = table.add_production(0, 2);
        table
            .add_shift(0, A, 1)
            .add_shift(1, B, 2)
            .add_reduce(2, EOF, s_ab)
            .add_goto(0, 0, 3)
            .add_reduce(3, EOF, start);
        table
    }

    pub fn reducer() -> ReduceTable<TestToken, Value> {
        let mut reducer = ReduceTable::new(concat);
        reducer.on(1, group);
        reducer
    }

    /// Tokenizes a string of `a`, `b` and `x` and appends end of input.
    pub fn tokens(input: &str) -> Vec<TestToken> {
        let mut tokens: Vec<TestToken> = input
            .chars()
            .enumerate()
            .map(|(col, ch)| {
                let id = match ch {
                    'a' => A,
                    'b' => B,
                    _ => X,
                };
                TestToken::new(id, &ch.to_string(), col)
            })
            .collect();
        tokens.push(TestToken::eos(EOF, input.len()));
        tokens
    }
}

pub mod sum {
    //! `E' -> E ; E -> E + E | num`, ambiguous.
    use super::*;

    pub const NUM: usize = 0;
    pub const PLUS: usize = 1;
    pub const EOF: usize = 2;

    pub fn table() -> ParseTable {
        let mut table = ParseTable::new(["number", "'+'", "end of input"], EOF);
        let start = table.add_start_production(1, 1);
        let e_add = table.add_production(0, 3);
        let e_num = table.add_production(0, 1);
        table
            .add_shift(0, NUM, 1)
            .add_goto(0, 0, 2)
            .add_reduce(1, PLUS, e_num)
            .add_reduce(1, EOF, e_num)
            .add_shift(2, PLUS, 3)
            .add_reduce(2, EOF, start)
            .add_shift(3, NUM, 1)
            .add_goto(3, 0, 4)
            .add_shift(4, PLUS, 3)
            .add_reduce(4, PLUS, e_add)
            .add_reduce(4, EOF, e_add);
        table
    }

    pub fn reducer() -> ReduceTable<TestToken, Value> {
        let mut reducer = ReduceTable::new(concat);
        reducer.on(1, add);
        reducer
    }

    /// Tokenizes digits and `+`, ignoring blanks, and appends end of input.
    pub fn tokens(input: &str) -> Vec<TestToken> {
        let mut tokens: Vec<TestToken> = input
            .char_indices()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(|(col, ch)| {
                let id = if ch == '+' { PLUS } else { NUM };
                TestToken::new(id, &ch.to_string(), col)
            })
            .collect();
        tokens.push(TestToken::eos(EOF, input.len()));
        tokens
    }
}

pub mod keyword {
    //! `S' -> S ; S -> if ident`, where `if` is a keyword only in state 0.
    use super::*;

    pub const IDENT: usize = 0;
    pub const EOF: usize = 1;
    pub const IF: usize = 2;

    pub fn table() -> ParseTable {
        let mut table = ParseTable::new(["identifier", "end of input", "'if'"], EOF);
        let start = table.add_start_production(1, 1);
        let s_if = table.add_production(0, 2);
        table
            .set_shift_lexer(0, 1)
            .add_shift(0, IF, 1)
            .add_shift(1, IDENT, 2)
            .add_reduce(2, EOF, s_if)
            .add_goto(0, 0, 3)
            .add_reduce(3, EOF, start);
        table
    }

    /// `S' -> S ; S -> A if ; A -> ident`, where `if` ends `A` only when
    /// state 1 classifies its lookahead through the keyword channel.
    pub fn suffix_table(keyword_lookahead: bool) -> ParseTable {
        let mut table = ParseTable::new(["identifier", "end of input", "'if'"], EOF);
        let start = table.add_start_production(1, 1);
        let s_a_if = table.add_production(0, 2);
        let a_ident = table.add_production(2, 1);
        if keyword_lookahead {
            table.set_reduce_lexer(1, 1);
        }
        table
            .add_shift(0, IDENT, 1)
            .add_goto(0, 0, 3)
            .add_goto(0, 2, 2)
            .add_reduce(1, IF, a_ident)
            .set_shift_lexer(2, 1)
            .add_shift(2, IF, 4)
            .add_reduce(4, EOF, s_a_if)
            .add_reduce(3, EOF, start);
        table
    }

    pub fn reducer() -> ReduceTable<TestToken, Value> {
        let mut reducer = ReduceTable::new(concat);
        reducer.on(1, group);
        reducer
    }

    pub fn tokens(input: &str) -> Vec<TestToken> {
        let mut col = 0;
        let mut tokens = Vec::new();
        for word in input.split_whitespace() {
            let token = TestToken::new(IDENT, word, col);
            tokens.push(if word == "if" { token.keyword(IF) } else { token });
            col += word.len() + 1;
        }
        tokens.push(TestToken::eos(EOF, col));
        tokens
    }
}

pub mod twin {
    //! `S' -> S ; S -> P b | Q c ; P -> a ; Q -> a`, with both items for `a`
    //! kept in separate states so that state 0 shifts `a` two ways.
    use super::*;

    pub const A: usize = 0;
    pub const B: usize = 1;
    pub const C: usize = 2;
    pub const EOF: usize = 3;

    fn p(rhs: &[&StackValue<TestToken, Value>], _: &TestToken) -> Value {
        format!("P({})", render(rhs[0]))
    }

    fn q(rhs: &[&StackValue<TestToken, Value>], _: &TestToken) -> Value {
        format!("Q({})", render(rhs[0]))
    }

    pub fn table() -> ParseTable {
        let mut table = ParseTable::new(["a", "b", "c", "end of input"], EOF);
        let start = table.add_start_production(1, 1);
        let s_pb = table.add_production(0, 2);
        let s_qc = table.add_production(0, 2);
        let p_a = table.add_production(2, 1);
        let q_a = table.add_production(3, 1);
        table
            .add_shift(0, A, 1)
            .add_shift(0, A, 2)
            .add_goto(0, 0, 3)
            .add_goto(0, 2, 4)
            .add_goto(0, 3, 5)
            .add_reduce(1, B, p_a)
            .add_reduce(2, C, q_a)
            .add_shift(4, B, 6)
            .add_reduce(6, EOF, s_pb)
            .add_shift(5, C, 7)
            .add_reduce(7, EOF, s_qc)
            .add_reduce(3, EOF, start);
        table
    }

    pub fn reducer() -> ReduceTable<TestToken, Value> {
        let mut reducer = ReduceTable::new(concat);
        reducer.on(1, group).on(2, group).on(3, p).on(4, q);
        reducer
    }

    /// Tokenizes a string of `a`, `b` and `c` and appends end of input.
    pub fn tokens(input: &str) -> Vec<TestToken> {
        let mut tokens: Vec<TestToken> = input
            .chars()
            .enumerate()
            .map(|(col, ch)| {
                let id = match ch {
                    'a' => A,
                    'b' => B,
                    _ => C,
                };
                TestToken::new(id, &ch.to_string(), col)
            })
            .collect();
        tokens.push(TestToken::eos(EOF, input.len()));
        tokens
    }
}
