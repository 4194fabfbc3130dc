use crate::{ErrorRecord, GlrError, Gss, NodeId, Reducer, StackValue, TransitionTable};

/// One candidate parse.
///
/// A head is a handle onto the shared [`Gss`] plus its own diagnostics.
/// Every transition is applied to a clone, never to the head it came from,
/// so one head can fan out into several without affecting its siblings.
#[derive(Debug, Clone)]
pub struct ParserHead {
    top: NodeId,
    errors: Vec<ErrorRecord>,
    recover_level: u32,
    accepted: bool,
    serial: u64,
}

impl ParserHead {
    pub(crate) fn new(top: NodeId, serial: u64) -> Self {
        Self {
            top,
            errors: Vec::new(),
            recover_level: 0,
            accepted: false,
            serial,
        }
    }

    /// Clones the head and stamps the clone with a new creation serial.
    pub(crate) fn fork(&self, serial: u64) -> Self {
        Self {
            serial,
            ..self.clone()
        }
    }

    pub fn top(&self) -> NodeId {
        self.top
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn recover_level(&self) -> u32 {
        self.recover_level
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Creation order within one engine; lower is older.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Pushes `token` in state `target`.
    pub fn shift<K, V>(&mut self, gss: &mut Gss<K, V>, token: K, target: usize) {
        self.top = gss.push(target, Some(StackValue::Lexeme(token)), Some(self.top));
    }

    /// Reduces by production `prod_id` with `lookahead` as the current token.
    ///
    /// Pops the production's arity, computes the new value through
    /// `reducer`, and pushes it in the goto state of the uncovered state.
    /// Reducing the start production marks the head accepted instead of
    /// consulting the goto table.
    pub fn reduce<K, V, T, R>(
        &mut self,
        gss: &mut Gss<K, V>,
        table: &T,
        reducer: &R,
        prod_id: usize,
        lookahead: &K,
    ) -> Result<(), GlrError>
    where
        T: TransitionTable + ?Sized,
        R: Reducer<K, V> + ?Sized,
    {
        let production = table
            .production(prod_id)
            .ok_or(GlrError::UnknownProduction { prod_id })?;
        let (value, base) = {
            let (rhs, base) = gss.pop(self.top, production.arity)?;
            (reducer.reduce(prod_id, &rhs, lookahead), base)
        };
        let uncovered = gss.state(base)?;
        let state = if production.is_start {
            uncovered
        } else {
            table
                .goto(uncovered, production.lhs)
                .ok_or(GlrError::MissingGoto {
                    state: uncovered,
                    lhs: production.lhs,
                })?
        };
        self.top = gss.push(state, Some(StackValue::Reduced(value)), Some(base));
        if production.is_start {
            self.accepted = true;
        }
        Ok(())
    }

    pub fn increase_recover_level(&mut self) {
        self.recover_level += 1;
    }

    pub fn add_error(&mut self, error: ErrorRecord) {
        self.errors.push(error);
    }
}
