//! linked-bucket-map: a single-threaded, insertion-ordered map for
//! heterogeneous keys, indexed by a fixed-depth prime bucket tree.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an associative container that preserves insertion order while
//!   accepting keys of any supported kind (bools, ints, floats,
//!   strings, nested lists, identity-only objects, and keys carrying a
//!   custom hash-code capability) with lookup cost bounded by local
//!   collision-chain length, never by map size.
//! - Layers:
//!   - MapKey / HashCode (`key`): the key sum type, strict identity
//!     equality, the integer/integer-string bridge, and the capability
//!     trait for self-hashing keys.
//!   - KeyHasher (`hasher`): one canonical `i64` hash per key; custom
//!     hash codes pass through verbatim, everything else is hashed
//!     structurally with integer canonicalization first.
//!   - BucketTree (`bucket`): 37 fixed prime moduli turn a hash into a
//!     path of indices; the never-resized hierarchy is stored flat, one
//!     leaf per occupied path, each leaf heading a collision chain.
//!   - Node (`node`): key, hash, value, and two independent link pairs,
//!     global order and bucket chain, held in a slotmap arena with
//!     stable generational keys instead of pointers.
//!   - Behaviours (`behaviour`): append/prepend insert strategies and
//!     normal/reverse loop strategies as stateless strategy objects.
//!   - LinkedBucketMap (`linked_map`): the orchestrator and public API.
//!
//! Constraints
//! - Single-threaded: keys hold `Rc`, so the map is `!Send`/`!Sync` by
//!   construction.
//! - No resizing or rehashing, ever: the bucket hierarchy has a fixed
//!   depth and the node arena grows as needed.
//! - Two keys are the same entry iff their hashes match and they are
//!   identical, or both are integer-representable with equal values
//!   (`Int(5)` and `Str("5")`, and nothing looser).
//! - Every mutation fully completes or fully no-ops.
//!
//! Why this split?
//! - Localize invariants: chain splicing, order linking, and cursor
//!   bookkeeping each live in one place with a small contract.
//! - The hasher and the bucket tree are pure functions of the key and
//!   the hash respectively; only the container carries mutable state.
//! - User code runs only in `HashCode::hash_code`, before any
//!   structural mutation begins.
//!
//! Notes and non-goals
//! - No concurrent access; wrap the whole map in a lock if you must
//!   share it; the dual-linked-list invariants do not survive
//!   fine-grained locking.
//! - No persistence, no eviction, no automatic resizing.
//! - The map owns a single iteration cursor; mutating the map
//!   mid-iteration leaves the cursor's future visits undefined (safely
//!   so). The borrowing iterators are checked by the compiler instead.
//! - Positional appends use an auto-increment cursor with native-array
//!   overflow semantics: past `i64::MAX` they are refused with a logged
//!   warning, not an error.

mod behaviour;
mod bucket;
mod hasher;
mod key;
mod linked_map;
mod node;

// Public surface
pub use behaviour::{InsertMode, LoopOrder};
pub use key::{HashCode, MapKey};
pub use linked_map::{Iter, LinkedBucketMap, SetError};
