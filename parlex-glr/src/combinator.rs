//! # Parser Combinators with Local Disambiguation
//!
//! A small continuation-passing combinator layer that lives beside the GLR
//! engine. Where the engine explores any number of heads over one shared
//! stack, [`ChooseBest`] resolves a *local*, two-way ambiguity: it runs two
//! sub-parsers on independent copies of the [`Cursor`] and lets the
//! [`ParseContext`] pick one of the two [`Outcome`]s.
//!
//! Each combinator is run with a continuation (`future`) describing the rest
//! of the parse. Both alternatives of a [`ChooseBest`] are therefore judged on
//! the complete parse they lead to, not just on the part they consume.
//!
//! A [`Cursor`] is an immutable value (token slice plus position), so forking
//! it is a copy and no scanner state is shared between alternatives.
//!
//! # Example
//! ```rust
//! # use parlex_glr::*;
//! # use parlex_glr::combinator::*;
//! # use smartstring::alias::String;
//! #[derive(Debug, Clone)]
//! struct Tok(usize);
//! impl Token for Tok {
//!     fn token_id(&self) -> usize { self.0 }
//!     fn literal(&self) -> String { String::new() }
//!     fn span(&self) -> Option<Span> { None }
//!     fn is_end_of_stream(&self) -> bool { false }
//!     fn correction(&self, token_id: usize, _: &str) -> Self { Tok(token_id) }
//! }
//!
//! // (a) | (a b), followed by c
//! let short = expect::<Tok>(0, "a").map(|_| 1);
//! let long = expect::<Tok>(0, "a").then(expect::<Tok>(1, "b")).map(|_| 2);
//! let parser = short.or_best(long).then(expect::<Tok>(2, "c"));
//!
//! let tokens = [Tok(0), Tok(1), Tok(2)];
//! let outcome = parser.parse(Cursor::new(&tokens), &mut DefaultContext::default());
//! assert_eq!(outcome.value.map(|(n, _)| n), Some(2));
//! assert!(outcome.cursor.is_at_end());
//! ```

use crate::{ErrorRecord, SyntaxErrorKind, Token};
use smartstring::alias::String;
use std::marker::PhantomData;

/// An immutable scan position over a token slice.
#[derive(Debug)]
pub struct Cursor<'a, K> {
    tokens: &'a [K],
    pos: usize,
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Cursor<'_, K> {}

impl<'a, K> Cursor<'a, K> {
    pub fn new(tokens: &'a [K]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a K> {
        self.tokens.get(self.pos)
    }

    /// The cursor one token further.
    pub fn advance(self) -> Self {
        Self {
            tokens: self.tokens,
            pos: (self.pos + 1).min(self.tokens.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// Result of running a parser to the end of its continuation.
#[derive(Debug)]
pub struct Outcome<'a, K, R> {
    /// `None` if the parse failed.
    pub value: Option<R>,
    pub cursor: Cursor<'a, K>,
    pub errors: Vec<ErrorRecord>,
}

impl<'a, K, R> Outcome<'a, K, R> {
    pub fn success(value: R, cursor: Cursor<'a, K>) -> Self {
        Self {
            value: Some(value),
            cursor,
            errors: Vec::new(),
        }
    }

    pub fn failure(cursor: Cursor<'a, K>, errors: Vec<ErrorRecord>) -> Self {
        Self {
            value: None,
            cursor,
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// Policy consulted by [`ChooseBest`].
pub trait ParseContext {
    fn choose_best<'a, K, R>(
        &mut self,
        a: Outcome<'a, K, R>,
        b: Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>;
}

/// Prefers a successful outcome, then the one with fewer errors, then the
/// first alternative.
#[derive(Debug, Clone, Default)]
pub struct DefaultContext {
    /// Number of decisions taken.
    pub choices: usize,
}

impl ParseContext for DefaultContext {
    fn choose_best<'a, K, R>(
        &mut self,
        a: Outcome<'a, K, R>,
        b: Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R> {
        self.choices += 1;
        match (a.is_success(), b.is_success()) {
            (true, false) => a,
            (false, true) => b,
            _ if b.errors.len() < a.errors.len() => b,
            _ => a,
        }
    }
}

/// A parser in continuation-passing style.
pub trait Combinator<K> {
    type Output;

    /// Runs the parser at `cursor` and hands its value and the advanced
    /// cursor to `future`.
    fn run<'a, C, R>(
        &self,
        cursor: Cursor<'a, K>,
        ctx: &mut C,
        future: &dyn Fn(Self::Output, Cursor<'a, K>, &mut C) -> Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>
    where
        C: ParseContext;

    /// Runs the parser with a continuation that just succeeds.
    fn parse<'a, C>(&self, cursor: Cursor<'a, K>, ctx: &mut C) -> Outcome<'a, K, Self::Output>
    where
        C: ParseContext,
    {
        self.run(cursor, ctx, &|value: Self::Output, cursor: Cursor<'a, K>, _: &mut C| {
            Outcome::success(value, cursor)
        })
    }

    fn then<B>(self, next: B) -> Then<Self, B>
    where
        Self: Sized,
    {
        Then {
            first: self,
            second: next,
        }
    }

    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { parser: self, f }
    }

    fn or_best<B>(self, other: B) -> ChooseBest<Self, B>
    where
        Self: Sized,
        B: Combinator<K, Output = Self::Output>,
    {
        ChooseBest {
            first: self,
            second: other,
        }
    }
}

/// Matches one token of a given class.
#[derive(Debug, Clone)]
pub struct Expect<K> {
    token_id: usize,
    description: String,
    _marker: PhantomData<fn() -> K>,
}

pub fn expect<K: Token>(token_id: usize, description: &str) -> Expect<K> {
    Expect {
        token_id,
        description: description.into(),
        _marker: PhantomData,
    }
}

impl<K: Token> Combinator<K> for Expect<K> {
    type Output = K;

    fn run<'a, C, R>(
        &self,
        cursor: Cursor<'a, K>,
        ctx: &mut C,
        future: &dyn Fn(K, Cursor<'a, K>, &mut C) -> Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>
    where
        C: ParseContext,
    {
        match cursor.peek() {
            Some(token) if token.token_id() == self.token_id => {
                future(token.clone(), cursor.advance(), ctx)
            }
            found => {
                let span = found.and_then(|token| token.span());
                let error = ErrorRecord::new(
                    SyntaxErrorKind::TokenMissing,
                    span,
                    self.description.clone(),
                );
                Outcome::failure(cursor, vec![error])
            }
        }
    }
}

/// Runs `first`, then `second`, yielding both values.
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<K, A, B> Combinator<K> for Then<A, B>
where
    A: Combinator<K>,
    A::Output: Clone,
    B: Combinator<K>,
{
    type Output = (A::Output, B::Output);

    fn run<'a, C, R>(
        &self,
        cursor: Cursor<'a, K>,
        ctx: &mut C,
        future: &dyn Fn(Self::Output, Cursor<'a, K>, &mut C) -> Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>
    where
        C: ParseContext,
    {
        self.first.run(
            cursor,
            ctx,
            &|a: A::Output, cursor: Cursor<'a, K>, ctx: &mut C| {
                self.second.run(
                    cursor,
                    ctx,
                    &|b: B::Output, cursor: Cursor<'a, K>, ctx: &mut C| {
                        future((a.clone(), b), cursor, ctx)
                    },
                )
            },
        )
    }
}

/// Transforms the value of a parser.
#[derive(Debug, Clone)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<K, P, F, U> Combinator<K> for Map<P, F>
where
    P: Combinator<K>,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn run<'a, C, R>(
        &self,
        cursor: Cursor<'a, K>,
        ctx: &mut C,
        future: &dyn Fn(U, Cursor<'a, K>, &mut C) -> Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>
    where
        C: ParseContext,
    {
        self.parser.run(
            cursor,
            ctx,
            &|value: P::Output, cursor: Cursor<'a, K>, ctx: &mut C| {
                future((self.f)(value), cursor, ctx)
            },
        )
    }
}

/// Runs both alternatives from the same cursor and keeps the outcome chosen
/// by [`ParseContext::choose_best`].
#[derive(Debug, Clone)]
pub struct ChooseBest<A, B> {
    first: A,
    second: B,
}

pub fn choose_best<K, A, B>(first: A, second: B) -> ChooseBest<A, B>
where
    A: Combinator<K>,
    B: Combinator<K, Output = A::Output>,
{
    ChooseBest { first, second }
}

impl<K, A, B> Combinator<K> for ChooseBest<A, B>
where
    A: Combinator<K>,
    B: Combinator<K, Output = A::Output>,
{
    type Output = A::Output;

    fn run<'a, C, R>(
        &self,
        cursor: Cursor<'a, K>,
        ctx: &mut C,
        future: &dyn Fn(Self::Output, Cursor<'a, K>, &mut C) -> Outcome<'a, K, R>,
    ) -> Outcome<'a, K, R>
    where
        C: ParseContext,
    {
        let a = self.first.run(cursor, ctx, future);
        let b = self.second.run(cursor, ctx, future);
        ctx.choose_best(a, b)
    }
}
