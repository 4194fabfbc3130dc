//! In-line syntax error recovery.
//!
//! Recovery runs when no head could shift the current token and none was
//! accepted. Each head that found no action is repaired in two independent
//! ways, both producing new heads with a raised recovery level:
//!
//! - **Deletion**: the current token is skipped. The repaired head keeps its
//!   stack and joins the next active set, so it is offered the following
//!   token. Not attempted at end of stream.
//! - **Insertion**: for every token class except end of stream, a corrective
//!   token is synthesized. Reductions on that class are followed
//!   breadth-first until the class can be shifted; each successful shift
//!   yields a head that is offered the current token again.
//!
//! The engine keeps recovering until some head shifts the token or is
//! accepted. This terminates as long as every state of the table has an
//! outgoing shift on some class.

use crate::{
    ErrorRecord, GlrError, ParserEngine, ParserHead, Reducer, SyntaxErrorKind, Token,
    TransitionTable,
};
use std::collections::VecDeque;
use std::mem;

impl<T, R, K, V> ParserEngine<T, R, K, V>
where
    T: TransitionTable,
    R: Reducer<K, V>,
    K: Token,
{
    /// Repairs every error candidate around `token`.
    ///
    /// Insertion heads replace the active set; deletion heads go to the
    /// shifted set. Returns `false` when there was nothing left to repair.
    pub(crate) fn recover_error(&mut self, token: &K) -> Result<bool, GlrError> {
        self.heads.clear();
        let candidates = mem::take(&mut self.error_candidates);
        if candidates.is_empty() {
            log::warn!("No head left to recover at {:?}", token);
            return Ok(false);
        }
        log::debug!(
            "Recovering {} heads at {:?} {:?}",
            candidates.len(),
            token.literal(),
            token.span()
        );

        let end_of_stream = self.table.end_of_stream();
        for head in &candidates {
            if !token.is_end_of_stream() {
                let mut deleted = head.fork(self.serials.next());
                deleted.increase_recover_level();
                deleted.add_error(ErrorRecord::new(
                    SyntaxErrorKind::TokenUnexpected,
                    token.span(),
                    token.literal(),
                ));
                log::trace!("Delete {:?} (head #{})", token, deleted.serial());
                self.shifted.push(deleted);
                self.stats.deletions += 1;
            }

            for token_id in (0..self.table.token_count()).filter(|&t| t != end_of_stream) {
                self.insert_token(head, token_id, token)?;
            }
        }

        let inserted = mem::take(&mut self.heads);
        self.stats.merged += self
            .cleaner
            .clean_heads(&self.gss, inserted, &mut self.heads);
        Ok(true)
    }

    /// Tries to insert a token of class `token_id` in front of `token` on
    /// `head`, following reductions on that class until it shifts.
    fn insert_token(
        &mut self,
        head: &ParserHead,
        token_id: usize,
        token: &K,
    ) -> Result<(), GlrError> {
        let mut queue = VecDeque::from([head.clone()]);
        while let Some(recover_head) = queue.pop_front() {
            let state = self.gss.state(recover_head.top())?;

            for &target in self.table.shifts(state, token_id) {
                let description = self.table.describe(token_id);
                let correction = token.correction(token_id, description);
                let mut inserted = recover_head.fork(self.serials.next());
                inserted.shift(&mut self.gss, correction, target);
                inserted.increase_recover_level();
                inserted.add_error(ErrorRecord::new(
                    SyntaxErrorKind::TokenMissing,
                    token.span(),
                    description,
                ));
                log::trace!(
                    "Insert {:?} {} -> {} (head #{})",
                    description,
                    state,
                    target,
                    inserted.serial()
                );
                self.heads.push(inserted);
                self.stats.insertions += 1;
            }

            for &prod_id in self.table.reduces(state, token_id) {
                let mut reduced = recover_head.fork(self.serials.next());
                reduced.reduce(
                    &mut self.gss,
                    &self.table,
                    &self.reducer,
                    prod_id,
                    token,
                )?;
                // accepting on a synthesized lookahead would hide the insertion
                if !reduced.is_accepted() {
                    queue.push_back(reduced);
                }
            }
        }
        Ok(())
    }
}
