//! Node: the unit of storage, woven into the global order and one bucket
//! chain at a time.

use crate::key::MapKey;
use slotmap::{DefaultKey, SlotMap};

/// Node arena; stable generational keys stand in for pointers, so a node
/// can participate in both doubly-linked structures without aliasing.
pub(crate) type Arena<V> = SlotMap<DefaultKey, Node<V>>;

/// A single entry. `prev`/`next` weave the global insertion order;
/// `bucket_prev`/`bucket_next` weave the collision chain at the node's
/// bucket-tree leaf. Both walks must always agree on the set of live
/// nodes.
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) key: MapKey,
    pub(crate) hash: i64,
    pub(crate) value: V,
    pub(crate) prev: Option<DefaultKey>,
    pub(crate) next: Option<DefaultKey>,
    pub(crate) bucket_prev: Option<DefaultKey>,
    pub(crate) bucket_next: Option<DefaultKey>,
}

impl<V> Node<V> {
    pub(crate) fn new(key: MapKey, hash: i64, value: V) -> Self {
        Self {
            key,
            hash,
            value,
            prev: None,
            next: None,
            bucket_prev: None,
            bucket_next: None,
        }
    }
}
