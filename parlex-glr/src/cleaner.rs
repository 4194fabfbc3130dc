//! # Head De-duplication
//!
//! Forking on every conflict makes the number of heads grow exponentially
//! unless equivalent heads are merged. [`HeadCleaner`] keeps one head per
//! equivalence class:
//!
//! - **Key**: two heads are equivalent when their stacks visit the same
//!   sequence of automaton states from top to root. Such heads react
//!   identically to all future input; they differ only in semantic values
//!   and diagnostics.
//! - **Tie-break**: the head with the lowest recovery level survives. Among
//!   equal levels the one created first survives.
//!
//! Survivors keep the position of the first head of their class, so the
//! output order is deterministic. Dropping a head releases its claim on any
//! stack suffix no other head reaches; [`Gss::sweep`] reclaims those nodes.

use crate::{Gss, ParserHead};
use std::collections::HashMap;

/// Merges equivalent heads. Holds scratch buffers reused between calls.
#[derive(Debug, Default)]
pub struct HeadCleaner {
    buckets: HashMap<(usize, usize), Vec<usize>>,
}

impl HeadCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one representative per equivalence class of `source` to
    /// `target` and returns the number of heads merged away.
    pub fn clean_heads<K, V, I>(
        &mut self,
        gss: &Gss<K, V>,
        source: I,
        target: &mut Vec<ParserHead>,
    ) -> usize
    where
        I: IntoIterator<Item = ParserHead>,
    {
        self.buckets.clear();
        let mut merged = 0;
        for head in source {
            let Some(top) = gss.node(head.top()) else {
                target.push(head);
                continue;
            };
            let bucket = self.buckets.entry((top.state(), top.depth())).or_default();
            let same = bucket
                .iter()
                .copied()
                .find(|&i| gss.same_state_path(target[i].top(), head.top()));
            match same {
                Some(i) => {
                    merged += 1;
                    log::debug!(
                        "Merge head #{} (level {}) with head #{} (level {})",
                        head.serial(),
                        head.recover_level(),
                        target[i].serial(),
                        target[i].recover_level()
                    );
                    if preferred(&head, &target[i]) {
                        target[i] = head;
                    }
                }
                None => {
                    bucket.push(target.len());
                    target.push(head);
                }
            }
        }
        merged
    }
}

fn preferred(a: &ParserHead, b: &ParserHead) -> bool {
    (a.recover_level(), a.serial()) < (b.recover_level(), b.serial())
}
