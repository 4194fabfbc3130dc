//! # Graph-Structured Stack
//!
//! All parse heads share one arena of immutable [`StackNode`]s. A node links
//! back to its predecessor, so each head's stack is the chain reachable from
//! its top node, and heads that forked from a common ancestor share the chain
//! below the fork point.
//!
//! Nodes are addressed by [`NodeId`] handles, so cloning a head copies an
//! integer. Nodes are never modified after [`Gss::push`]. They are released
//! only by [`Gss::sweep`], which frees every node not reachable from the
//! given live tops. A freed slot may be reused by a later push; live nodes
//! never move.

use crate::GlrError;

/// Handle of a node in a [`Gss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Semantic value held by a stack node.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue<K, V> {
    /// A shifted token.
    Lexeme(K),
    /// The result of a reduction.
    Reduced(V),
}

impl<K, V> StackValue<K, V> {
    pub fn as_lexeme(&self) -> Option<&K> {
        match self {
            StackValue::Lexeme(token) => Some(token),
            StackValue::Reduced(_) => None,
        }
    }

    pub fn as_reduced(&self) -> Option<&V> {
        match self {
            StackValue::Lexeme(_) => None,
            StackValue::Reduced(value) => Some(value),
        }
    }
}

/// One frame of the parse stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackNode<K, V> {
    state: usize,
    value: Option<StackValue<K, V>>,
    predecessor: Option<NodeId>,
    depth: usize,
}

impl<K, V> StackNode<K, V> {
    /// Automaton state entered when this frame was pushed.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Semantic value; `None` only for the root.
    pub fn value(&self) -> Option<&StackValue<K, V>> {
        self.value.as_ref()
    }

    pub fn predecessor(&self) -> Option<NodeId> {
        self.predecessor
    }

    /// Number of frames below this one.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Arena of stack nodes shared by all heads of a [`ParserEngine`](crate::ParserEngine).
#[derive(Debug)]
pub struct Gss<K, V> {
    nodes: Vec<Option<StackNode<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Default for Gss<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Gss<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Pushes a new node and returns its handle.
    pub fn push(
        &mut self,
        state: usize,
        value: Option<StackValue<K, V>>,
        predecessor: Option<NodeId>,
    ) -> NodeId {
        let depth = match predecessor {
            Some(p) => self.node(p).map(|n| n.depth + 1).unwrap_or(0),
            None => 0,
        };
        let node = StackNode {
            state,
            value,
            predecessor,
            depth,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Returns the node behind `id`, or `None` if it has been reclaimed.
    pub fn node(&self, id: NodeId) -> Option<&StackNode<K, V>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Automaton state of `id`, or [`GlrError::StaleNode`] if it was
    /// reclaimed.
    pub fn state(&self, id: NodeId) -> Result<usize, GlrError> {
        self.node(id)
            .map(StackNode::state)
            .ok_or(GlrError::StaleNode { node: id.0 })
    }

    /// Returns the values of the `n` topmost frames, bottom first, together
    /// with the ancestor `n` levels below `top`.
    pub fn pop(
        &self,
        top: NodeId,
        n: usize,
    ) -> Result<(Vec<&StackValue<K, V>>, NodeId), GlrError> {
        let mut values = Vec::with_capacity(n);
        let mut cur = top;
        for _ in 0..n {
            let node = self
                .node(cur)
                .ok_or(GlrError::StackUnderflow { arity: n })?;
            let (Some(value), Some(pred)) = (node.value.as_ref(), node.predecessor) else {
                return Err(GlrError::StackUnderflow { arity: n });
            };
            values.push(value);
            cur = pred;
        }
        values.reverse();
        Ok((values, cur))
    }

    /// Iterates over the chain from `top` down to the root.
    pub fn chain(&self, top: NodeId) -> impl Iterator<Item = (NodeId, &StackNode<K, V>)> + '_ {
        let mut cur = Some(top);
        std::iter::from_fn(move || {
            let id = cur?;
            let node = self.node(id)?;
            cur = node.predecessor;
            Some((id, node))
        })
    }

    /// Do the chains below `a` and `b` visit the same sequence of states?
    pub fn same_state_path(&self, a: NodeId, b: NodeId) -> bool {
        let mut ia = self.chain(a);
        let mut ib = self.chain(b);
        loop {
            match (ia.next(), ib.next()) {
                (Some((id_a, _)), Some((id_b, _))) if id_a == id_b => return true,
                (Some((_, na)), Some((_, nb))) => {
                    if na.state != nb.state || na.depth != nb.depth {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frees every node not reachable from `roots` and returns how many
    /// nodes were freed.
    pub fn sweep<I>(&mut self, roots: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut marked = vec![false; self.nodes.len()];
        for root in roots {
            let mut cur = Some(root);
            while let Some(id) = cur {
                if marked[id.0] {
                    break;
                }
                marked[id.0] = true;
                cur = self.node(id).and_then(|n| n.predecessor);
            }
        }
        let mut freed = 0;
        for (slot, live) in marked.into_iter().enumerate() {
            if !live && self.nodes[slot].take().is_some() {
                self.free.push(slot);
                freed += 1;
            }
        }
        freed
    }

    /// Renders the states of the chain below `top`, root first.
    pub fn dump(&self, top: NodeId) -> String {
        let mut states: Vec<usize> = self.chain(top).map(|(_, n)| n.state).collect();
        states.reverse();
        let mut output = String::new();
        for state in states {
            output.push_str(&format!("<{}> ", state));
        }
        output
    }
}
