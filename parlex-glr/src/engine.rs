//! # GLR Parser Engine
//!
//! [`ParserEngine`] drives a [`TransitionTable`] over a stream of tokens fed
//! one at a time through [`ParserEngine::input`]. Every live head is offered
//! the token; a head forks once per applicable shift and once per applicable
//! reduction. Reduced heads do not consume the token and are offered it
//! again within the same step, until they shift, get accepted, or find no
//! action. Heads that reduce the start production are accepted.
//!
//! When no head can shift the token and none was accepted, the engine
//! repairs the input in place (see the `recovery` module) and tries again.
//! Syntax errors therefore never stop the engine; they are recorded on the
//! repaired heads and reported by [`ParserEngine::get_result`].
//!
//! After each token the surviving heads are de-duplicated by
//! [`HeadCleaner`] and stack nodes no longer reachable from any head are
//! reclaimed.
//!
//! The engine is single-threaded: one call to `input` processes one token to
//! completion.

use crate::{
    ErrorSink, GlrError, Gss, HeadCleaner, ParserHead, Reducer, StackNode, StackValue,
    SyntaxErrors, Token, TransitionTable,
};
use std::mem;

/// Counters collected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    /// Extra heads created because a head had more than one action.
    pub forks: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub merged: usize,
    pub reclaimed: usize,
}

/// Hands out head creation serials.
#[derive(Debug, Default)]
pub(crate) struct Serials(u64);

impl Serials {
    #[inline]
    pub(crate) fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// A table-driven GLR parser.
///
/// - `T`: the automaton.
/// - `R`: semantic actions computing reduced values of type `V`.
/// - `K`: the token type, pushed on the stack on shift.
///
/// # Example
/// ```rust
/// # use parlex_glr::*;
/// # use smartstring::alias::String;
/// #[derive(Debug, Clone)]
/// struct Tok(usize, &'static str);
///
/// impl Token for Tok {
///     fn token_id(&self) -> usize { self.0 }
///     fn literal(&self) -> String { self.1.into() }
///     fn span(&self) -> Option<Span> { None }
///     fn is_end_of_stream(&self) -> bool { self.0 == 1 }
///     fn correction(&self, token_id: usize, _description: &str) -> Self {
///         Tok(token_id, "")
///     }
/// }
///
/// // S' -> S ; S -> a
/// let mut table = ParseTable::new(["a", "$"], 1);
/// let start = table.add_start_production(1, 1);
/// let s_a = table.add_production(0, 1);
/// table
///     .add_shift(0, 0, 1)
///     .add_reduce(1, 1, s_a)
///     .add_goto(0, 0, 2)
///     .add_reduce(2, 1, start);
///
/// fn count(rhs: &[&StackValue<Tok, usize>], _: &Tok) -> usize {
///     rhs.len()
/// }
/// let reducer = ReduceTable::new(count);
///
/// let mut engine = ParserEngine::new(table, reducer, SyntaxErrors::default());
/// engine.input(Tok(0, "a")).unwrap();
/// engine.input(Tok(1, "")).unwrap();
///
/// assert_eq!(engine.accepted_count(), 1);
/// let mut diags = Diagnostics::new();
/// assert_eq!(*engine.get_result(0, &mut diags).unwrap(), 1);
/// assert!(diags.is_empty());
/// ```
pub struct ParserEngine<T, R, K, V> {
    pub(crate) table: T,
    pub(crate) reducer: R,
    error_def: SyntaxErrors,

    pub(crate) gss: Gss<K, V>,

    pub(crate) heads: Vec<ParserHead>,
    pub(crate) shifted: Vec<ParserHead>,
    pub(crate) error_candidates: Vec<ParserHead>,
    accepted: Vec<ParserHead>,

    pub(crate) cleaner: HeadCleaner,
    pub(crate) serials: Serials,
    pub(crate) stats: EngineStats,
}

impl<T, R, K, V> ParserEngine<T, R, K, V>
where
    T: TransitionTable,
    R: Reducer<K, V>,
    K: Token,
{
    /// Creates an engine with a single head on the root node (state 0).
    pub fn new(table: T, reducer: R, error_def: SyntaxErrors) -> Self {
        let mut gss = Gss::new();
        let root = gss.push(0, None, None);
        Self {
            table,
            reducer,
            error_def,
            gss,
            heads: vec![ParserHead::new(root, 0)],
            shifted: Vec::new(),
            error_candidates: Vec::new(),
            accepted: Vec::new(),
            cleaner: HeadCleaner::new(),
            serials: Serials::default(),
            stats: EngineStats::default(),
        }
    }

    /// Number of live, not yet accepted heads.
    pub fn current_stack_count(&self) -> usize {
        self.heads.len()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// No head is left to consume further input.
    pub fn is_finished(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn heads(&self) -> &[ParserHead] {
        &self.heads
    }

    pub fn accepted(&self) -> &[ParserHead] {
        &self.accepted
    }

    pub fn stack(&self) -> &Gss<K, V> {
        &self.gss
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn stats(&self) -> EngineStats {
        self.stats.clone()
    }

    /// Advances every live head over `token`.
    ///
    /// Returns an error only if the table is malformed; syntax errors are
    /// repaired and recorded on the heads. After an error the engine has no
    /// live heads left and heads accepted on `token` are discarded, so later
    /// calls change nothing.
    pub fn input(&mut self, token: K) -> Result<(), GlrError> {
        self.stats.tokens += 1;
        if log::log_enabled!(log::Level::Trace) {
            self.dump_heads(&token);
        }
        let accepted_before = self.accepted.len();
        if let Err(err) = self.step_token(&token) {
            log::error!("Abandoning parse at {:?}: {}", token, err);
            self.heads.clear();
            self.shifted.clear();
            self.error_candidates.clear();
            self.accepted.truncate(accepted_before);
            self.stats.reclaimed += self
                .gss
                .sweep(self.accepted.iter().map(ParserHead::top));
            return Err(err);
        }
        self.swap_and_clean();
        Ok(())
    }

    /// Offers `token` to the active set, recovering until some head shifts
    /// it or is accepted.
    fn step_token(&mut self, token: &K) -> Result<(), GlrError> {
        loop {
            let accepted_before = self.accepted.len();

            // reduced heads are appended to `heads` and revisited in this pass
            let mut i = 0;
            while i < self.heads.len() {
                let head = self.heads[i].clone();
                self.step_head(head, token)?;
                i += 1;
            }

            if !self.shifted.is_empty() || self.accepted.len() > accepted_before {
                return Ok(());
            }
            if !self.recover_error(token)? {
                return Ok(());
            }
        }
    }

    /// Feeds every token of `tokens` and returns the number of accepted heads.
    pub fn parse<I>(&mut self, tokens: I) -> Result<usize, GlrError>
    where
        I: IntoIterator<Item = K>,
    {
        for token in tokens {
            self.input(token)?;
        }
        Ok(self.accepted_count())
    }

    /// Returns the value of the accepted head at `index` and forwards its
    /// errors, in order, to `sink`.
    ///
    /// An out-of-range `index` is reported before anything is forwarded.
    pub fn get_result<S>(&self, index: usize, sink: &mut S) -> Result<&V, GlrError>
    where
        S: ErrorSink + ?Sized,
    {
        let head = self
            .accepted
            .get(index)
            .ok_or(GlrError::ResultIndexOutOfRange {
                index,
                len: self.accepted.len(),
            })?;
        let value = self
            .gss
            .node(head.top())
            .and_then(StackNode::value)
            .and_then(StackValue::as_reduced)
            .ok_or(GlrError::MissingResult { index })?;
        for error in head.errors() {
            sink.add_error(
                self.error_def.id_of(error.kind),
                error.span,
                error.argument.as_deref(),
            );
        }
        Ok(value)
    }

    /// Offers `token` to one head, forking once per shift and reduction.
    fn step_head(&mut self, head: ParserHead, token: &K) -> Result<(), GlrError> {
        let state = self.gss.state(head.top())?;
        let mut actions = 0;

        let shift_id = classify(token, self.table.lexer_for_shift(state));
        for &target in self.table.shifts(state, shift_id) {
            let mut shifted = head.fork(self.serials.next());
            shifted.shift(&mut self.gss, token.clone(), target);
            log::trace!("Shift {} -> {} on {:?}", state, target, token);
            self.shifted.push(shifted);
            self.stats.shifts += 1;
            actions += 1;
        }

        let reduce_id = classify(token, self.table.lexer_for_reduce(state));
        for &prod_id in self.table.reduces(state, reduce_id) {
            let mut reduced = head.fork(self.serials.next());
            reduced.reduce(
                &mut self.gss,
                &self.table,
                &self.reducer,
                prod_id,
                token,
            )?;
            self.stats.reductions += 1;
            actions += 1;
            if reduced.is_accepted() {
                log::trace!("Accept head #{} ({})", reduced.serial(), prod_id);
                self.accepted.push(reduced);
            } else {
                log::trace!(
                    "Reduce {}({}) -> {}",
                    state,
                    prod_id,
                    self.gss.state(reduced.top())?
                );
                self.heads.push(reduced);
            }
        }

        if actions == 0 {
            self.error_candidates.push(head);
        } else {
            self.stats.forks += actions - 1;
        }
        Ok(())
    }

    /// Installs the shifted heads as the next active set, de-duplicates it and
    /// the accepted set, and reclaims unreachable stack nodes.
    fn swap_and_clean(&mut self) {
        self.heads.clear();
        self.error_candidates.clear();

        if !self.accepted.is_empty() {
            let accepted = mem::take(&mut self.accepted);
            self.stats.merged +=
                self.cleaner
                    .clean_heads(&self.gss, accepted, &mut self.accepted);
        }

        let shifted = mem::take(&mut self.shifted);
        self.stats.merged += self
            .cleaner
            .clean_heads(&self.gss, shifted, &mut self.heads);

        let reclaimed = self.gss.sweep(
            self.heads
                .iter()
                .chain(self.accepted.iter())
                .map(ParserHead::top),
        );
        self.stats.reclaimed += reclaimed;
        log::debug!(
            "{} heads, {} accepted, {} stack nodes ({} reclaimed)",
            self.heads.len(),
            self.accepted.len(),
            self.gss.len(),
            reclaimed
        );
    }

    pub fn dump_heads(&self, incoming: &K) {
        if self.heads.is_empty() {
            log::trace!("<>");
        }
        for head in &self.heads {
            log::trace!(
                "#{} {}<-  {:?}  (level {}, {} errors)",
                head.serial(),
                self.gss.dump(head.top()),
                incoming,
                head.recover_level(),
                head.errors().len()
            );
        }
    }
}

/// Class of `token` under `lexer`, or its primary class.
#[inline]
pub(crate) fn classify<K: Token>(token: &K, lexer: Option<usize>) -> usize {
    match lexer {
        Some(lexer) => token.token_id_in(lexer),
        None => token.token_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_table_data::{TestToken, Value, ab, keyword, sum, twin};
    use crate::{Diagnostics, ErrorId, NodeId, ParseTable, ReduceTable, SyntaxErrorKind};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    type TestEngine = ParserEngine<ParseTable, ReduceTable<TestToken, Value>, TestToken, Value>;

    fn run(
        table: ParseTable,
        reducer: ReduceTable<TestToken, Value>,
        tokens: Vec<TestToken>,
    ) -> TestEngine {
        init_logger();
        let mut engine = ParserEngine::new(table, reducer, SyntaxErrors::default());
        engine.parse(tokens).unwrap();
        engine
    }

    #[test]
    fn accepts_valid_input_without_errors() {
        let engine = run(ab::table(), ab::reducer(), ab::tokens("ab"));
        assert!(engine.is_finished());
        assert_eq!(engine.accepted_count(), 1);

        let mut diags = Diagnostics::new();
        assert_eq!(engine.get_result(0, &mut diags).unwrap(), "[a b]");
        assert!(diags.is_empty());
        assert_eq!(engine.accepted()[0].recover_level(), 0);

        let stats = engine.stats();
        assert_eq!(stats.tokens, 3);
        assert_eq!(stats.shifts, 2);
        assert_eq!(stats.reductions, 2);
        assert_eq!(stats.deletions + stats.insertions, 0);
    }

    #[test]
    fn parsing_is_deterministic() {
        let collect = |input: &str| {
            let engine = run(ab::table(), ab::reducer(), ab::tokens(input));
            let mut diags = Diagnostics::new();
            let value = engine.get_result(0, &mut diags).unwrap().clone();
            (value, diags.errors, engine.stats())
        };
        assert_eq!(collect("axxb"), collect("axxb"));
        assert_eq!(collect("b"), collect("b"));
    }

    #[test]
    fn ambiguity_forks_and_merges() {
        let engine = run(sum::table(), sum::reducer(), sum::tokens("1 + 2 + 3"));
        assert_eq!(engine.accepted_count(), 1);
        assert_eq!(engine.get_result(0, &mut ()).unwrap(), "((1+2)+3)");

        let stats = engine.stats();
        assert_eq!(stats.tokens, 6);
        assert_eq!(stats.forks, 1);
        assert_eq!(stats.merged, 1);
        assert!(stats.reclaimed > 0);
        // only the accepted value and the root remain
        assert_eq!(engine.stack().len(), 2);
    }

    #[test]
    fn forked_heads_share_the_stack() {
        init_logger();
        let mut engine = ParserEngine::new(sum::table(), sum::reducer(), SyntaxErrors::default());
        let tokens = sum::tokens("1 + 2 +");
        // leave out end of input
        for token in tokens.into_iter().take(4) {
            engine.input(token).unwrap();
        }
        assert_eq!(engine.current_stack_count(), 2);
        assert_eq!(engine.accepted_count(), 0);

        let roots: Vec<NodeId> = engine
            .heads()
            .iter()
            .filter_map(|h| engine.stack().chain(h.top()).last().map(|(id, _)| id))
            .collect();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0], roots[1]);

        let dumps: Vec<String> = engine
            .heads()
            .iter()
            .map(|h| engine.stack().dump(h.top()))
            .collect();
        assert_eq!(dumps, ["<0> <2> <3> <4> <3> ", "<0> <2> <3> "]);
    }

    #[test]
    fn stack_nodes_never_change() {
        init_logger();
        let mut engine = ParserEngine::new(sum::table(), sum::reducer(), SyntaxErrors::default());
        let mut tokens = sum::tokens("1 + 2 + 3").into_iter();
        for token in tokens.by_ref().take(2) {
            engine.input(token).unwrap();
        }
        let top = engine.heads()[0].top();
        let snapshot: Vec<_> = engine
            .stack()
            .chain(top)
            .map(|(id, node)| (id, node.clone()))
            .collect();
        assert_eq!(snapshot.len(), 3);

        // the number extends the snapshotted chain
        engine.input(tokens.next().unwrap()).unwrap();
        let head = &engine.heads()[0];
        let below: Vec<_> = engine
            .stack()
            .chain(head.top())
            .skip(1)
            .map(|(id, node)| (id, node.clone()))
            .collect();
        assert_eq!(below, snapshot);

        for token in tokens {
            engine.input(token).unwrap();
        }
        assert_eq!(engine.accepted_count(), 1);
        assert_eq!(engine.accepted()[0].recover_level(), 0);
    }

    #[test]
    fn lexer_channel_selects_keyword_class() {
        let engine = run(keyword::table(), keyword::reducer(), keyword::tokens("if if"));
        let mut diags = Diagnostics::new();
        assert_eq!(engine.get_result(0, &mut diags).unwrap(), "[if if]");
        assert!(diags.is_empty());
    }

    #[test]
    fn reduce_channel_classifies_lookahead() {
        let engine = run(
            keyword::suffix_table(true),
            keyword::reducer(),
            keyword::tokens("x if"),
        );
        let mut diags = Diagnostics::new();
        assert_eq!(engine.get_result(0, &mut diags).unwrap(), "[x if]");
        assert!(diags.is_empty());
        let stats = engine.stats();
        assert_eq!(stats.reductions, 3);
        assert_eq!(stats.deletions + stats.insertions, 0);

        // under its primary class `if` cannot end `A`
        let engine = run(
            keyword::suffix_table(false),
            keyword::reducer(),
            keyword::tokens("x if"),
        );
        let mut diags = Diagnostics::new();
        assert_eq!(engine.get_result(0, &mut diags).unwrap(), "[x 'if']");
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn shift_conflict_forks_heads() {
        init_logger();
        let mut engine = ParserEngine::new(twin::table(), twin::reducer(), SyntaxErrors::default());
        let mut tokens = twin::tokens("ab").into_iter();

        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(engine.current_stack_count(), 2);
        assert_eq!(engine.stats().forks, 1);
        let dumps: Vec<String> = engine
            .heads()
            .iter()
            .map(|h| engine.stack().dump(h.top()))
            .collect();
        assert_eq!(dumps, ["<0> <1> ", "<0> <2> "]);
        assert!(engine.heads().iter().all(|h| h.recover_level() == 0));

        // only the `P` branch survives `b`
        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(engine.current_stack_count(), 1);
        assert_eq!(engine.stack().dump(engine.heads()[0].top()), "<0> <4> <6> ");

        for token in tokens {
            engine.input(token).unwrap();
        }
        let mut diags = Diagnostics::new();
        assert_eq!(engine.get_result(0, &mut diags).unwrap(), "[P(a) b]");
        assert!(diags.is_empty());
        assert_eq!(engine.stats().shifts, 3);

        let engine = run(twin::table(), twin::reducer(), twin::tokens("ac"));
        assert_eq!(engine.accepted_count(), 1);
        assert_eq!(engine.get_result(0, &mut ()).unwrap(), "[Q(a) c]");
    }

    #[test]
    fn only_repairs_raise_the_recovery_level() {
        init_logger();
        let levels = |engine: &TestEngine| {
            engine
                .heads()
                .iter()
                .map(ParserHead::recover_level)
                .collect::<Vec<_>>()
        };
        let mut engine = ParserEngine::new(ab::table(), ab::reducer(), SyntaxErrors::default());
        let mut tokens = ab::tokens("axb").into_iter();

        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(levels(&engine), [0]);
        let parent = engine.heads()[0].clone();

        // `x` is deleted
        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(levels(&engine), [parent.recover_level() + 1]);
        let repaired = engine.heads()[0].clone();
        assert_eq!(repaired.top(), parent.top());
        assert_eq!(repaired.errors().len(), parent.errors().len() + 1);

        // the shift of `b` and the reductions at end of input inherit it
        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(levels(&engine), [repaired.recover_level()]);
        engine.input(tokens.next().unwrap()).unwrap();
        assert_eq!(engine.accepted_count(), 1);
        let accepted = &engine.accepted()[0];
        assert_eq!(accepted.recover_level(), repaired.recover_level());
        assert_eq!(accepted.errors().len(), 1);
    }

    #[test]
    fn result_index_is_checked_before_forwarding() {
        let engine = run(ab::table(), ab::reducer(), ab::tokens("axb"));
        let mut diags = Diagnostics::new();
        assert_eq!(
            engine.get_result(5, &mut diags),
            Err(GlrError::ResultIndexOutOfRange { index: 5, len: 1 })
        );
        assert!(diags.is_empty());

        assert!(engine.get_result(0, &mut diags).is_ok());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn error_codes_come_from_configuration() {
        init_logger();
        let codes = SyntaxErrors {
            token_unexpected: ErrorId(100),
            token_missing: ErrorId(200),
            other: ErrorId(0),
        };
        let mut engine = ParserEngine::new(ab::table(), ab::reducer(), codes);
        engine.parse(ab::tokens("axb")).unwrap();
        let mut diags = Diagnostics::new();
        engine.get_result(0, &mut diags).unwrap();
        assert_eq!(diags.errors[0].id, ErrorId(100));
        assert_eq!(
            engine.accepted()[0].errors()[0].kind,
            Some(SyntaxErrorKind::TokenUnexpected)
        );
    }

    #[test]
    fn missing_goto_is_reported() {
        init_logger();
        let mut table = ParseTable::new(["a", "$"], 1);
        let s_a = table.add_production(0, 1);
        table.add_shift(0, 0, 1).add_reduce(1, 1, s_a);
        let mut engine = ParserEngine::new(table, ab::reducer(), SyntaxErrors::default());
        engine.input(TestToken::new(0, "a", 0)).unwrap();
        assert_eq!(
            engine.input(TestToken::eos(1, 1)),
            Err(GlrError::MissingGoto { state: 0, lhs: 0 })
        );

        // nothing of the failed token is carried over
        assert!(engine.is_finished());
        assert!(engine.shifted.is_empty());
        assert!(engine.error_candidates.is_empty());
        assert_eq!(engine.accepted_count(), 0);
        assert!(engine.stack().is_empty());

        engine.input(TestToken::eos(1, 1)).unwrap();
        assert!(engine.is_finished());
        assert_eq!(engine.accepted_count(), 0);
    }

    #[test]
    fn stack_underflow_is_reported() {
        init_logger();
        let mut table = ParseTable::new(["a", "$"], 1);
        let too_long = table.add_production(0, 3);
        table.add_shift(0, 0, 1).add_reduce(1, 1, too_long).add_goto(0, 0, 2);
        let mut engine = ParserEngine::new(table, ab::reducer(), SyntaxErrors::default());
        engine.input(TestToken::new(0, "a", 0)).unwrap();
        assert_eq!(
            engine.input(TestToken::eos(1, 1)),
            Err(GlrError::StackUnderflow { arity: 3 })
        );
    }
}
