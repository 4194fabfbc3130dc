use crate::StackValue;

/// Semantic action of one production.
///
/// Receives the values of the right-hand side, leftmost first, and the
/// current lookahead token, and returns the value of the left-hand side.
pub type SemanticAction<K, V> = fn(&[&StackValue<K, V>], &K) -> V;

/// Computes the value of a reduction.
///
/// Implementations must be pure: the same production applied to the same
/// values yields the same result, since forked heads may reduce the same
/// stack suffix more than once.
pub trait Reducer<K, V> {
    fn reduce(&self, prod_id: usize, rhs: &[&StackValue<K, V>], lookahead: &K) -> V;
}

/// A [`Reducer`] dispatching on the production id.
///
/// Productions without a registered action use the fallback action.
///
/// # Example
/// ```rust
/// # use parlex_glr::{ReduceTable, Reducer, StackValue};
/// fn zero(_: &[&StackValue<char, i64>], _: &char) -> i64 {
///     0
/// }
/// fn count(rhs: &[&StackValue<char, i64>], _: &char) -> i64 {
///     rhs.len() as i64
/// }
/// let mut reducer = ReduceTable::new(zero);
/// reducer.on(1, count);
///
/// let a = StackValue::Lexeme('a');
/// assert_eq!(reducer.reduce(1, &[&a, &a], &'$'), 2);
/// assert_eq!(reducer.reduce(5, &[&a], &'$'), 0);
/// ```
pub struct ReduceTable<K, V> {
    actions: Vec<Option<SemanticAction<K, V>>>,
    fallback: SemanticAction<K, V>,
}

impl<K, V> ReduceTable<K, V> {
    pub fn new(fallback: SemanticAction<K, V>) -> Self {
        Self {
            actions: Vec::new(),
            fallback,
        }
    }

    /// Registers the action of production `prod_id`, replacing any earlier one.
    pub fn on(&mut self, prod_id: usize, action: SemanticAction<K, V>) -> &mut Self {
        if self.actions.len() <= prod_id {
            self.actions.resize(prod_id + 1, None);
        }
        self.actions[prod_id] = Some(action);
        self
    }
}

impl<K, V> Reducer<K, V> for ReduceTable<K, V> {
    #[inline]
    fn reduce(&self, prod_id: usize, rhs: &[&StackValue<K, V>], lookahead: &K) -> V {
        let action = self
            .actions
            .get(prod_id)
            .copied()
            .flatten()
            .unwrap_or(self.fallback);
        action(rhs, lookahead)
    }
}
