//! LinkedBucketMap: the container orchestrating hashing, bucket descent,
//! chain walking, node linking, and iteration.

use crate::behaviour::{
    insert_behaviour, loop_behaviour, InsertBehaviour, InsertMode, LoopBehaviour, LoopOrder,
};
use crate::bucket::{BucketPath, BucketTree};
use crate::hasher::KeyHasher;
use crate::key::MapKey;
use crate::node::{Arena, Node};
use core::cell::Cell;
use core::fmt;
use core::hash::BuildHasher;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Error returned by [`LinkedBucketMap::set`].
#[derive(Debug)]
pub enum SetError {
    /// The key contains a component whose identity cannot be matched
    /// deterministically (a NaN float); storing it would create an
    /// unretrievable entry, so the insert is rejected up front.
    UnstableKey,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::UnstableKey => f.write_str("key identity is unstable (contains NaN)"),
        }
    }
}

impl std::error::Error for SetError {}

/// Auto-increment cursor for positional (keyless) appends. The next
/// offset only grows; explicit integer keys at or past it pull it
/// forward. Once incrementing would leave the representable range the
/// cursor is exhausted and positional appends are refused, until the
/// delete-at-`i64::MAX` reset re-arms it.
#[derive(Debug, Clone, Copy)]
struct PositionalCursor {
    next: i64,
    exhausted: bool,
}

impl PositionalCursor {
    fn new() -> Self {
        Self {
            next: 0,
            exhausted: false,
        }
    }

    fn bump(&mut self) {
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
    }
}

/// Outcome of a chain walk: the matching node if any, plus the
/// statistics an insert needs to splice on a miss.
struct Lookup {
    node: Option<DefaultKey>,
    chain_len: usize,
    last_visited: Option<DefaultKey>,
}

/// An insertion-ordered map from heterogeneous [`MapKey`]s to `V`.
///
/// Entries are indexed through a fixed-depth prime bucket tree (no
/// resizing, ever) and woven into a doubly-linked global order. Lookup
/// cost is bounded by the longest collision chain, never by the number
/// of entries.
///
/// The map owns a single iteration cursor (`rewind`/`valid`/`current`/
/// `current_key`/`next`). The cursor is not reentrant, and mutating the
/// map mid-iteration leaves the set of remaining visited nodes
/// undefined: a stale cursor safely reads as invalid, but which nodes
/// `next` still reaches is not specified. The borrowing [`iter`]
/// family is immune by construction.
///
/// Single-threaded by design: keys hold `Rc`, so the map is neither
/// `Send` nor `Sync`.
///
/// [`iter`]: LinkedBucketMap::iter
pub struct LinkedBucketMap<V, S = RandomState> {
    hasher: KeyHasher<S>,
    buckets: BucketTree<S>,
    nodes: Arena<V>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    insert_mode: InsertMode,
    loop_order: LoopOrder,
    cursor: PositionalCursor,
    // High-water mark over every chain ever walked; lookups through
    // `&self` raise it too, hence the Cell.
    longest_chain: Cell<usize>,
    iterated: Option<DefaultKey>,
}

impl<V: 'static> LinkedBucketMap<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Build a map pre-populated from an ordered sequence of pairs, with
    /// the given modes. A `None` key is a positional append, as in
    /// [`append`](LinkedBucketMap::append).
    pub fn with_config<I>(
        pairs: I,
        insert_mode: InsertMode,
        loop_order: LoopOrder,
    ) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = (Option<MapKey>, V)>,
    {
        let mut map = Self::new();
        map.insert_mode = insert_mode;
        map.loop_order = loop_order;
        for (key, value) in pairs {
            match key {
                Some(key) => map.set(key, value)?,
                None => {
                    map.append(value);
                }
            }
        }
        Ok(map)
    }
}

impl<V: 'static> Default for LinkedBucketMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> LinkedBucketMap<V, S>
where
    V: 'static,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(build: S) -> Self {
        Self {
            buckets: BucketTree::new(build.clone()),
            hasher: KeyHasher::new(build),
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            insert_mode: InsertMode::default(),
            loop_order: LoopOrder::default(),
            cursor: PositionalCursor::new(),
            longest_chain: Cell::new(0),
            iterated: None,
        }
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// High-water mark of the longest collision chain ever walked. Never
    /// decreases, not even on delete.
    pub fn longest_chain_len(&self) -> usize {
        self.longest_chain.get()
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    pub fn loop_order(&self) -> LoopOrder {
        self.loop_order
    }

    /// Select where future inserts attach. Existing nodes keep their
    /// positions; nothing is replayed.
    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.insert_mode = mode;
    }

    /// Select the direction future rewinds and iterators walk.
    pub fn set_loop_order(&mut self, order: LoopOrder) {
        self.loop_order = order;
    }

    /// Walk the collision chain at `path`, comparing stored hashes and
    /// applying entry identity. Raises the longest-chain high-water mark
    /// with the walked length regardless of outcome.
    fn retrieve(&self, key: &MapKey, hash: i64, path: &BucketPath) -> Lookup {
        let mut lookup = Lookup {
            node: None,
            chain_len: 0,
            last_visited: None,
        };
        let mut cursor = self.buckets.head(path);
        while let Some(node_key) = cursor {
            let node = &self.nodes[node_key];
            lookup.chain_len += 1;
            if node.hash == hash && node.key.same_entry(key) {
                lookup.node = Some(node_key);
                break;
            }
            lookup.last_visited = Some(node_key);
            cursor = node.bucket_next;
        }
        if lookup.chain_len > self.longest_chain.get() {
            self.longest_chain.set(lookup.chain_len);
        }
        lookup
    }

    fn find_node(&self, key: &MapKey) -> Option<DefaultKey> {
        let hash = self.hasher.hash_key(key);
        let path = BucketPath::for_hash(hash);
        self.retrieve(key, hash, &path).node
    }

    pub fn exists(&self, key: &MapKey) -> bool {
        self.find_node(key).is_some()
    }

    pub fn get(&self, key: &MapKey) -> Option<&V> {
        self.find_node(key).map(|node| &self.nodes[node].value)
    }

    pub fn get_mut(&mut self, key: &MapKey) -> Option<&mut V> {
        let node = self.find_node(key)?;
        Some(&mut self.nodes[node].value)
    }

    /// Insert or overwrite the entry for `key`.
    ///
    /// Overwriting never moves an entry: the node keeps its position in
    /// both the global order and its collision chain. An
    /// integer-representable key at or past the positional cursor pulls
    /// the cursor to just past it.
    pub fn set(&mut self, key: MapKey, value: V) -> Result<(), SetError> {
        if !key.is_stable() {
            return Err(SetError::UnstableKey);
        }
        let pending = key
            .as_int()
            .filter(|&offset| !self.cursor.exhausted && offset >= self.cursor.next);
        self.store(key, value);
        if let Some(offset) = pending {
            self.cursor.next = offset;
            self.cursor.bump();
        }
        Ok(())
    }

    /// Positional append: stores `value` under the cursor's next integer
    /// offset. Returns `false` (and logs a warning) when the cursor is
    /// exhausted; the map is then left unmodified.
    pub fn append(&mut self, value: V) -> bool {
        if self.cursor.exhausted {
            log::warn!(
                "positional append rejected: the next offset is past the representable integer range"
            );
            return false;
        }
        self.store(MapKey::Int(self.cursor.next), value);
        self.cursor.bump();
        true
    }

    fn store(&mut self, key: MapKey, value: V) {
        let hash = self.hasher.hash_key(&key);
        let path = BucketPath::for_hash(hash);
        let lookup = self.retrieve(&key, hash, &path);
        match lookup.node {
            Some(node) => self.nodes[node].value = value,
            None => self.create_node(key, hash, path, value, lookup),
        }
    }

    /// Splice a fresh node into its bucket chain and the global order.
    fn create_node(&mut self, key: MapKey, hash: i64, path: BucketPath, value: V, lookup: Lookup) {
        let node = self.nodes.insert(Node::new(key, hash, value));
        match lookup.last_visited {
            // First key to hash to this leaf: the node heads a new chain.
            None => self.buckets.insert_head(path, node),
            // Otherwise splice onto the end of the existing chain.
            Some(prev) => {
                self.nodes[prev].bucket_next = Some(node);
                self.nodes[node].bucket_prev = Some(prev);
            }
        }
        let behaviour = insert_behaviour::<V>(self.insert_mode);
        self.head = Some(behaviour.link_head(&mut self.nodes, self.head, node));
        self.tail = Some(behaviour.link_tail(&mut self.nodes, self.tail, node));

        let walked = lookup.chain_len + 1;
        if walked > self.longest_chain.get() {
            self.longest_chain.set(walked);
        }
    }

    /// Remove the entry for `key`. An absent key is a silent no-op;
    /// returns whether an entry was removed.
    pub fn unset(&mut self, key: &MapKey) -> bool {
        let hash = self.hasher.hash_key(key);
        let path = BucketPath::for_hash(hash);
        let Some(node_key) = self.retrieve(key, hash, &path).node else {
            return false;
        };
        let Some(node) = self.nodes.remove(node_key) else {
            return false;
        };

        // Patch the global order around the node.
        if let Some(prev) = node.prev {
            self.nodes[prev].next = node.next;
        }
        if let Some(next) = node.next {
            self.nodes[next].prev = node.prev;
        }
        if self.head == Some(node_key) {
            self.head = node.next;
        }
        if self.tail == Some(node_key) {
            self.tail = node.prev;
        }

        // Patch the bucket chain; a deleted chain head moves the leaf to
        // the remainder of the chain (possibly clearing it).
        if let Some(bucket_prev) = node.bucket_prev {
            self.nodes[bucket_prev].bucket_next = node.bucket_next;
        }
        if let Some(bucket_next) = node.bucket_next {
            self.nodes[bucket_next].bucket_prev = node.bucket_prev;
        }
        if node.bucket_prev.is_none() {
            self.buckets.set_head(&path, node.bucket_next);
        }

        // Deleting the maximum integer key (strictly an `Int`, never its
        // string form) re-arms exactly one positional append at that
        // boundary.
        if *key == MapKey::Int(i64::MAX) {
            self.cursor = PositionalCursor {
                next: i64::MAX,
                exhausted: false,
            };
        }
        true
    }

    /// Reset the iteration cursor per the active loop order.
    pub fn rewind(&mut self) {
        self.iterated = loop_behaviour::<V>(self.loop_order).rewind(self.head, self.tail);
    }

    /// Whether the cursor denotes a live node. A node deleted out from
    /// under the cursor reads as invalid (generational keys never alias
    /// a later entry).
    pub fn valid(&self) -> bool {
        self.iterated.is_some_and(|node| self.nodes.contains_key(node))
    }

    /// Value at the cursor, or `None` when the cursor is invalid.
    pub fn current(&self) -> Option<&V> {
        self.iterated
            .and_then(|node| self.nodes.get(node))
            .map(|node| &node.value)
    }

    /// Key at the cursor, or `None` when the cursor is invalid.
    pub fn current_key(&self) -> Option<&MapKey> {
        self.iterated
            .and_then(|node| self.nodes.get(node))
            .map(|node| &node.key)
    }

    /// Advance the cursor per the active loop order.
    pub fn next(&mut self) {
        if let Some(node) = self.iterated {
            self.iterated = loop_behaviour::<V>(self.loop_order).advance(&self.nodes, node);
        }
    }

    /// Iterator over `(key, value)` in the loop order captured now.
    pub fn iter(&self) -> Iter<'_, V> {
        let behaviour = loop_behaviour::<V>(self.loop_order);
        Iter {
            nodes: &self.nodes,
            cursor: behaviour.rewind(self.head, self.tail),
            behaviour,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &MapKey> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

/// Borrowing iterator over entries, walking the global order in the
/// loop order captured at creation time.
pub struct Iter<'a, V: 'static> {
    nodes: &'a Arena<V>,
    cursor: Option<DefaultKey>,
    behaviour: &'static dyn LoopBehaviour<V>,
}

impl<'a, V: 'static> Iterator for Iter<'a, V> {
    type Item = (&'a MapKey, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.nodes.get(key)?;
        self.cursor = self.behaviour.advance(self.nodes, key);
        Some((&node.key, &node.value))
    }
}

impl<'a, V, S> IntoIterator for &'a LinkedBucketMap<V, S>
where
    V: 'static,
    S: BuildHasher + Clone + Default,
{
    type Item = (&'a MapKey, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
