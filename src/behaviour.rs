//! Pluggable insert-mode and loop-order behaviours.
//!
//! Each behaviour is a small stateless strategy behind a capability
//! trait; the factory functions resolve a configured mode to its
//! strategy. Reconfiguring a map swaps the strategy for future
//! operations without replaying existing nodes.

use crate::node::Arena;
use slotmap::DefaultKey;

/// Where a newly created node attaches in the global order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InsertMode {
    /// New nodes become the new tail.
    #[default]
    Append,
    /// New nodes become the new head.
    Prepend,
}

/// Which direction iteration walks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LoopOrder {
    /// Head to tail, following `next`.
    #[default]
    Normal,
    /// Tail to head, following `prev`.
    Reverse,
}

pub(crate) trait InsertBehaviour<V> {
    /// Link the new node against the current head; returns the new head.
    fn link_head(&self, nodes: &mut Arena<V>, head: Option<DefaultKey>, node: DefaultKey)
        -> DefaultKey;
    /// Link the new node against the current tail; returns the new tail.
    fn link_tail(&self, nodes: &mut Arena<V>, tail: Option<DefaultKey>, node: DefaultKey)
        -> DefaultKey;
}

pub(crate) trait LoopBehaviour<V> {
    /// Cursor position after a rewind.
    fn rewind(&self, head: Option<DefaultKey>, tail: Option<DefaultKey>) -> Option<DefaultKey>;
    /// Cursor position after advancing past `node`; `None` when the walk
    /// is exhausted (or the node is no longer live).
    fn advance(&self, nodes: &Arena<V>, node: DefaultKey) -> Option<DefaultKey>;
}

pub(crate) struct AppendInsert;
pub(crate) struct PrependInsert;
pub(crate) struct NormalLoop;
pub(crate) struct ReverseLoop;

impl<V> InsertBehaviour<V> for AppendInsert {
    fn link_head(
        &self,
        _nodes: &mut Arena<V>,
        head: Option<DefaultKey>,
        node: DefaultKey,
    ) -> DefaultKey {
        // In append mode the head moves only for the first node ever.
        head.unwrap_or(node)
    }

    fn link_tail(
        &self,
        nodes: &mut Arena<V>,
        tail: Option<DefaultKey>,
        node: DefaultKey,
    ) -> DefaultKey {
        if let Some(tail) = tail {
            nodes[tail].next = Some(node);
            nodes[node].prev = Some(tail);
        }
        node
    }
}

impl<V> InsertBehaviour<V> for PrependInsert {
    fn link_head(
        &self,
        nodes: &mut Arena<V>,
        head: Option<DefaultKey>,
        node: DefaultKey,
    ) -> DefaultKey {
        if let Some(head) = head {
            nodes[head].prev = Some(node);
            nodes[node].next = Some(head);
        }
        node
    }

    fn link_tail(
        &self,
        _nodes: &mut Arena<V>,
        tail: Option<DefaultKey>,
        node: DefaultKey,
    ) -> DefaultKey {
        // In prepend mode the tail moves only for the first node ever.
        tail.unwrap_or(node)
    }
}

impl<V> LoopBehaviour<V> for NormalLoop {
    fn rewind(&self, head: Option<DefaultKey>, _tail: Option<DefaultKey>) -> Option<DefaultKey> {
        head
    }

    fn advance(&self, nodes: &Arena<V>, node: DefaultKey) -> Option<DefaultKey> {
        nodes.get(node).and_then(|n| n.next)
    }
}

impl<V> LoopBehaviour<V> for ReverseLoop {
    fn rewind(&self, _head: Option<DefaultKey>, tail: Option<DefaultKey>) -> Option<DefaultKey> {
        tail
    }

    fn advance(&self, nodes: &Arena<V>, node: DefaultKey) -> Option<DefaultKey> {
        nodes.get(node).and_then(|n| n.prev)
    }
}

pub(crate) fn insert_behaviour<V: 'static>(mode: InsertMode) -> &'static dyn InsertBehaviour<V> {
    match mode {
        InsertMode::Prepend => &PrependInsert,
        InsertMode::Append => &AppendInsert,
    }
}

pub(crate) fn loop_behaviour<V: 'static>(order: LoopOrder) -> &'static dyn LoopBehaviour<V> {
    match order {
        LoopOrder::Reverse => &ReverseLoop,
        LoopOrder::Normal => &NormalLoop,
    }
}
