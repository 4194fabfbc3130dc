//! # Calculator Parser
//!
//! This module couples a hand-written GLR table for the ambiguous grammar
//!
//! ```text
//! Start -> Expr
//! Expr  -> Expr + Expr | Expr * Expr | ( Expr ) | number
//! ```
//!
//! with semantic actions that build an [`Expr`]: a fully parenthesized
//! rendering of the chosen grouping plus its value.
//!
//! The table comes in two flavors, selected by [`Grouping`]:
//!
//! - [`Grouping::Ambiguous`] keeps both the shift and the reduce action on
//!   every operator conflict, so the engine forks and explores every
//!   grouping. Equivalent accepted parses are merged and the first one to
//!   complete survives, which for this table is the left-grouped one.
//! - [`Grouping::Precedence`] leaves out the conflicting actions a
//!   precedence declaration would remove (`*` binds tighter than `+`, both left
//!   associative), leaving a deterministic automaton.
//!
//! Syntax errors are repaired by the engine. Tokens synthesized during repair
//! render as `?` and make the value unknown.

use crate::{CalcError, CalcLexer, CalcToken, TokenID, TokenValue};
use parlex_glr::{
    Diagnostics, EngineStats, ParseTable, ParserEngine, ReduceTable, Span, StackValue,
    SyntaxErrors,
};
use smartstring::alias::String;

/// Productions of the calculator grammar, numbered as in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProdID {
    /// Start -> Expr
    Start = 0,
    /// Expr -> Expr + Expr
    Add = 1,
    /// Expr -> Expr * Expr
    Mul = 2,
    /// Expr -> ( Expr )
    Paren = 3,
    /// Expr -> number
    Number = 4,
}

impl From<ProdID> for usize {
    fn from(p: ProdID) -> Self {
        p as usize
    }
}

/// Nonterminal ids used by the goto table.
const EXPR: usize = 0;
const START: usize = 1;

/// How operator conflicts are represented in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// Fork on every conflict.
    Ambiguous,
    /// Resolve conflicts by operator precedence.
    #[default]
    Precedence,
}

/// Builds the transition table.
///
/// ```text
/// 0: Start -> . Expr           1: Expr -> number .
/// 2: Expr -> ( . Expr )        3: Start -> Expr . | Expr -> Expr . op Expr
/// 4: Expr -> ( Expr . )        5: Expr -> Expr + . Expr
/// 6: Expr -> Expr * . Expr     7: Expr -> ( Expr ) .
/// 8: Expr -> Expr + Expr .     9: Expr -> Expr * Expr .
/// ```
pub fn calc_table(grouping: Grouping) -> ParseTable {
    use TokenID::*;

    let mut table = ParseTable::new(TokenID::DESCRIPTIONS, End.into());
    for (prod_id, lhs, arity) in [
        (ProdID::Start, START, 1),
        (ProdID::Add, EXPR, 3),
        (ProdID::Mul, EXPR, 3),
        (ProdID::Paren, EXPR, 3),
        (ProdID::Number, EXPR, 1),
    ] {
        let id = if prod_id == ProdID::Start {
            table.add_start_production(lhs, arity)
        } else {
            table.add_production(lhs, arity)
        };
        debug_assert_eq!(id, usize::from(prod_id));
    }

    // states where an expression may start
    for (state, goto) in [(0, 3), (2, 4), (5, 8), (6, 9)] {
        table
            .add_shift(state, Number.into(), 1)
            .add_shift(state, LeftParen.into(), 2)
            .add_goto(state, EXPR, goto);
    }

    // states after a complete expression
    let precedence = grouping == Grouping::Precedence;
    for state in [3, 4, 8, 9] {
        for (op, target) in [(Plus, 5), (Star, 6)] {
            // `E + E . +` and `E * E . op` only reduce
            if precedence && matches!((state, op), (8, Plus) | (9, _)) {
                continue;
            }
            table.add_shift(state, op.into(), target);
        }
    }
    table.add_reduce(3, End.into(), ProdID::Start.into());
    table.add_shift(4, RightParen.into(), 7);

    for lookahead in [Plus, Star, RightParen, End] {
        table
            .add_reduce(1, lookahead.into(), ProdID::Number.into())
            .add_reduce(7, lookahead.into(), ProdID::Paren.into())
            .add_reduce(9, lookahead.into(), ProdID::Mul.into());
        // `E + E . *` only shifts
        if !(precedence && lookahead == Star) {
            table.add_reduce(8, lookahead.into(), ProdID::Add.into());
        }
    }
    table
}

/// The semantic value of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// Fully parenthesized rendering; `?` marks an inserted operand.
    pub text: String,
    /// `None` if an operand was inserted by error recovery or the
    /// computation overflowed.
    pub value: Option<i64>,
    pub span: Option<Span>,
}

impl Expr {
    fn unknown(span: Option<Span>) -> Self {
        Expr {
            text: "?".into(),
            value: None,
            span,
        }
    }
}

type Rhs<'a> = [&'a StackValue<CalcToken, Expr>];

fn merge(a: Option<Span>, b: Option<Span>) -> Option<Span> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(&b)),
        (a, b) => a.or(b),
    }
}

fn operand(value: &StackValue<CalcToken, Expr>) -> Expr {
    match value {
        StackValue::Reduced(expr) => expr.clone(),
        StackValue::Lexeme(token) => Expr::unknown(token.span),
    }
}

fn lexeme_span(value: &StackValue<CalcToken, Expr>) -> Option<Span> {
    match value {
        StackValue::Lexeme(token) => token.span,
        StackValue::Reduced(expr) => expr.span,
    }
}

fn binary(rhs: &Rhs, op: &str, apply: fn(i64, i64) -> Option<i64>) -> Expr {
    let left = operand(rhs[0]);
    let right = operand(rhs[2]);
    let value = match (left.value, right.value) {
        (Some(l), Some(r)) => apply(l, r),
        _ => None,
    };
    Expr {
        text: format!("({}{}{})", left.text, op, right.text).into(),
        value,
        span: merge(left.span, right.span),
    }
}

fn reduce_start(rhs: &Rhs, _: &CalcToken) -> Expr {
    operand(rhs[0])
}

fn reduce_add(rhs: &Rhs, _: &CalcToken) -> Expr {
    binary(rhs, "+", i64::checked_add)
}

fn reduce_mul(rhs: &Rhs, _: &CalcToken) -> Expr {
    binary(rhs, "*", i64::checked_mul)
}

fn reduce_paren(rhs: &Rhs, _: &CalcToken) -> Expr {
    Expr {
        span: merge(lexeme_span(rhs[0]), lexeme_span(rhs[2])),
        ..operand(rhs[1])
    }
}

fn reduce_number(rhs: &Rhs, _: &CalcToken) -> Expr {
    match rhs.first().and_then(|v| v.as_lexeme()) {
        Some(CalcToken {
            value: TokenValue::Number(n),
            span,
            ..
        }) => Expr {
            text: n.to_string().into(),
            value: Some(*n),
            span: *span,
        },
        Some(token) => Expr::unknown(token.span),
        None => Expr::unknown(None),
    }
}

fn reduce_unknown(_: &Rhs, lookahead: &CalcToken) -> Expr {
    Expr::unknown(lookahead.span)
}

/// Semantic actions of the calculator grammar.
pub fn calc_reducer() -> ReduceTable<CalcToken, Expr> {
    let mut reducer = ReduceTable::new(reduce_unknown);
    reducer
        .on(ProdID::Start.into(), reduce_start)
        .on(ProdID::Add.into(), reduce_add)
        .on(ProdID::Mul.into(), reduce_mul)
        .on(ProdID::Paren.into(), reduce_paren)
        .on(ProdID::Number.into(), reduce_number);
    reducer
}

pub type CalcEngine = ParserEngine<ParseTable, ReduceTable<CalcToken, Expr>, CalcToken, Expr>;

/// The result of evaluating one input.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub expr: Expr,
    /// Syntax errors repaired to obtain `expr`.
    pub diagnostics: Diagnostics,
    pub stats: EngineStats,
}

/// A calculator parser: a [`CalcEngine`] with the calculator's table and
/// semantic actions.
///
/// # Example
/// ```rust
/// # use parlex_glr_calc::{CalcParser, Grouping};
/// let parser = CalcParser::new(Grouping::Precedence);
/// let eval = parser.evaluate("1 + 2 * 3").unwrap();
/// assert_eq!(eval.expr.text, "(1+(2*3))");
/// assert_eq!(eval.expr.value, Some(7));
/// assert!(eval.diagnostics.is_empty());
/// ```
pub struct CalcParser {
    grouping: Grouping,
    errors: SyntaxErrors,
}

impl CalcParser {
    pub fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            errors: SyntaxErrors::default(),
        }
    }

    /// Uses `errors` as the diagnostic codes.
    pub fn with_errors(mut self, errors: SyntaxErrors) -> Self {
        self.errors = errors;
        self
    }

    /// Creates a fresh engine for one input.
    pub fn engine(&self) -> CalcEngine {
        ParserEngine::new(calc_table(self.grouping), calc_reducer(), self.errors)
    }

    /// Tokenizes and parses `source`, returning the surviving parse.
    pub fn evaluate(&self, source: &str) -> Result<Evaluation, CalcError> {
        let mut engine = self.engine();
        for token in CalcLexer::try_new(source)? {
            engine.input(token?)?;
        }
        if engine.accepted_count() == 0 {
            return Err(CalcError::NoParse);
        }
        if engine.accepted_count() > 1 {
            log::debug!("{} distinct parses, keeping the first", engine.accepted_count());
        }
        let mut diagnostics = Diagnostics::new();
        let expr = engine.get_result(0, &mut diagnostics)?.clone();
        Ok(Evaluation {
            expr,
            diagnostics,
            stats: engine.stats(),
        })
    }
}
