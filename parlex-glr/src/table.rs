//! # Transition Tables
//!
//! The engine consumes a precomputed shift/reduce automaton through the
//! [`TransitionTable`] trait. Unlike a deterministic LR table, a GLR table may
//! hold several shift targets and several reductions for one
//! `(state, token class)` pair; the engine forks a head for each of them.
//!
//! [`ParseTable`] is an in-memory implementation filled entry by entry. It is
//! handy for tests and for small hand-written automata. It stores actions, it
//! does not derive them from a grammar.

use smartstring::alias::String;
use std::collections::HashMap;

/// Metadata of one grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// Nonterminal on the left-hand side, used for the goto lookup.
    pub lhs: usize,
    /// Number of right-hand side symbols popped by a reduction.
    pub arity: usize,
    /// Reducing this production accepts the input.
    pub is_start: bool,
}

/// Read-only view of a GLR automaton.
///
/// States are dense `usize` indices with `0` as the start state. Token
/// classes are dense indices in `0..token_count()`.
pub trait TransitionTable {
    /// Lexical channel used to classify the lookahead when deciding shifts in
    /// `state`, or `None` for the token's primary class.
    fn lexer_for_shift(&self, state: usize) -> Option<usize>;

    /// Lexical channel used to classify the lookahead when deciding
    /// reductions in `state`, or `None` for the token's primary class.
    fn lexer_for_reduce(&self, state: usize) -> Option<usize>;

    /// Ordered shift targets. More than one target is a shift/shift conflict.
    fn shifts(&self, state: usize, token_id: usize) -> &[usize];

    /// Ordered production ids to reduce by.
    fn reduces(&self, state: usize, token_id: usize) -> &[usize];

    fn production(&self, prod_id: usize) -> Option<Production>;

    /// Target state after reducing to nonterminal `lhs` with `state`
    /// uncovered on the stack.
    fn goto(&self, state: usize, lhs: usize) -> Option<usize>;

    /// Number of token classes, including the end-of-stream class.
    fn token_count(&self) -> usize;

    /// Class of the end-of-stream sentinel. It is never synthesized during
    /// recovery.
    fn end_of_stream(&self) -> usize;

    /// Human-readable description of a token class, used in diagnostics.
    fn describe(&self, token_id: usize) -> &str;
}

/// A [`TransitionTable`] backed by hash maps.
///
/// # Example
/// ```rust
/// # use parlex_glr::{ParseTable, TransitionTable};
/// // S' -> S ; S -> a
/// let mut table = ParseTable::new(["a", "end of input"], 1);
/// let start = table.add_start_production(1, 1);
/// let s_a = table.add_production(0, 1);
/// table
///     .add_shift(0, 0, 1)
///     .add_reduce(1, 1, s_a)
///     .add_goto(0, 0, 2)
///     .add_reduce(2, 1, start);
///
/// assert_eq!(table.shifts(0, 0), &[1]);
/// assert!(table.production(start).unwrap().is_start);
/// assert_eq!(table.describe(1), "end of input");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseTable {
    descriptions: Vec<String>,
    end_of_stream: usize,
    productions: Vec<Production>,
    shifts: HashMap<(usize, usize), Vec<usize>>,
    reduces: HashMap<(usize, usize), Vec<usize>>,
    gotos: HashMap<(usize, usize), usize>,
    shift_lexers: HashMap<usize, usize>,
    reduce_lexers: HashMap<usize, usize>,
}

impl ParseTable {
    /// Creates an empty table over the given token class descriptions.
    /// `end_of_stream` is the class of the end-of-stream sentinel.
    pub fn new<'a, I>(descriptions: I, end_of_stream: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            descriptions: descriptions.into_iter().map(String::from).collect(),
            end_of_stream,
            ..Self::default()
        }
    }

    /// Registers a production and returns its id.
    pub fn add_production(&mut self, lhs: usize, arity: usize) -> usize {
        self.productions.push(Production {
            lhs,
            arity,
            is_start: false,
        });
        self.productions.len() - 1
    }

    /// Registers the accepting production and returns its id.
    pub fn add_start_production(&mut self, lhs: usize, arity: usize) -> usize {
        self.productions.push(Production {
            lhs,
            arity,
            is_start: true,
        });
        self.productions.len() - 1
    }

    pub fn add_shift(&mut self, state: usize, token_id: usize, target: usize) -> &mut Self {
        let targets = self.shifts.entry((state, token_id)).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
        self
    }

    pub fn add_reduce(&mut self, state: usize, token_id: usize, prod_id: usize) -> &mut Self {
        let prods = self.reduces.entry((state, token_id)).or_default();
        if !prods.contains(&prod_id) {
            prods.push(prod_id);
        }
        self
    }

    pub fn add_goto(&mut self, state: usize, lhs: usize, target: usize) -> &mut Self {
        self.gotos.insert((state, lhs), target);
        self
    }

    /// Classify the lookahead through `lexer` when shifting in `state`.
    pub fn set_shift_lexer(&mut self, state: usize, lexer: usize) -> &mut Self {
        self.shift_lexers.insert(state, lexer);
        self
    }

    /// Classify the lookahead through `lexer` when reducing in `state`.
    pub fn set_reduce_lexer(&mut self, state: usize, lexer: usize) -> &mut Self {
        self.reduce_lexers.insert(state, lexer);
        self
    }
}

impl TransitionTable for ParseTable {
    fn lexer_for_shift(&self, state: usize) -> Option<usize> {
        self.shift_lexers.get(&state).copied()
    }

    fn lexer_for_reduce(&self, state: usize) -> Option<usize> {
        self.reduce_lexers.get(&state).copied()
    }

    fn shifts(&self, state: usize, token_id: usize) -> &[usize] {
        self.shifts
            .get(&(state, token_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn reduces(&self, state: usize, token_id: usize) -> &[usize] {
        self.reduces
            .get(&(state, token_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn production(&self, prod_id: usize) -> Option<Production> {
        self.productions.get(prod_id).copied()
    }

    fn goto(&self, state: usize, lhs: usize) -> Option<usize> {
        self.gotos.get(&(state, lhs)).copied()
    }

    fn token_count(&self) -> usize {
        self.descriptions.len()
    }

    fn end_of_stream(&self) -> usize {
        self.end_of_stream
    }

    fn describe(&self, token_id: usize) -> &str {
        self.descriptions
            .get(token_id)
            .map(|s| s.as_str())
            .unwrap_or("<unknown>")
    }
}
