//! Canonical key hashing: the capability override and the default
//! structural hasher.

use crate::key::MapKey;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

/// Reduces any [`MapKey`] to its canonical `i64` hash.
///
/// `Hashed` keys use their own [`HashCode`](crate::HashCode) verbatim; the
/// default hasher is never invoked for them. All other keys are hashed
/// structurally through the map's `BuildHasher`, after canonicalizing
/// integer-representable keys to the integer itself: `Int(5)` and
/// `Str("5")` are the same entry, so they must land on the same bucket
/// path.
///
/// Hashing is deterministic for the lifetime of the map instance (the
/// `BuildHasher` is seeded once at construction); hashes never leave the
/// map, so cross-instance stability is not required.
pub(crate) struct KeyHasher<S = RandomState> {
    build: S,
}

impl<S> KeyHasher<S>
where
    S: BuildHasher,
{
    pub(crate) fn new(build: S) -> Self {
        Self { build }
    }

    pub(crate) fn hash_key(&self, key: &MapKey) -> i64 {
        if let MapKey::Hashed(custom) = key {
            return custom.hash_code();
        }
        match key.as_int() {
            Some(i) => self.build.hash_one(MapKey::Int(i)) as i64,
            None => self.build.hash_one(key) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::HashCode;
    use std::rc::Rc;

    fn hasher() -> KeyHasher {
        KeyHasher::new(RandomState::new())
    }

    /// Invariant: hashing is deterministic within one hasher instance.
    #[test]
    fn deterministic_per_instance() {
        let h = hasher();
        let key = MapKey::List(vec![MapKey::Int(1), MapKey::Str("a".to_string())]);
        assert_eq!(h.hash_key(&key), h.hash_key(&key));
    }

    /// Invariant: equal keys hash equal; in particular the int bridge:
    /// an integer and its string literal produce the same hash.
    #[test]
    fn int_and_int_string_collide_by_construction() {
        let h = hasher();
        assert_eq!(h.hash_key(&MapKey::Int(5)), h.hash_key(&MapKey::Str("5".to_string())));
        assert_eq!(h.hash_key(&MapKey::Int(-12)), h.hash_key(&MapKey::Str("-12".to_string())));
        // Leading zeros parse to the same integer.
        assert_eq!(h.hash_key(&MapKey::Int(5)), h.hash_key(&MapKey::Str("05".to_string())));
        // A non-numeric string does not take the integer path.
        assert_ne!(h.hash_key(&MapKey::Int(5)), h.hash_key(&MapKey::Str("5x".to_string())));
    }

    /// Invariant: composite hashing is order- and structure-sensitive.
    #[test]
    fn list_hash_sensitive_to_order_and_nesting() {
        let h = hasher();
        let ab = MapKey::List(vec![MapKey::Int(1), MapKey::Int(2)]);
        let ba = MapKey::List(vec![MapKey::Int(2), MapKey::Int(1)]);
        let nested = MapKey::List(vec![MapKey::List(vec![MapKey::Int(1), MapKey::Int(2)])]);
        assert_ne!(h.hash_key(&ab), h.hash_key(&ba));
        assert_ne!(h.hash_key(&ab), h.hash_key(&nested));
    }

    /// Invariant: a `Hashed` key's code is used verbatim; the default
    /// hasher is bypassed entirely.
    #[test]
    fn custom_hash_code_used_verbatim() {
        struct Fixed(i64);
        impl HashCode for Fixed {
            fn hash_code(&self) -> i64 {
                self.0
            }
        }

        let h = hasher();
        let key = MapKey::Hashed(Rc::new(Fixed(-77)));
        assert_eq!(h.hash_key(&key), -77);

        // Two distinct allocations with the same code share a hash (and
        // hence a bucket path) without being the same entry.
        let other = MapKey::Hashed(Rc::new(Fixed(-77)));
        assert_eq!(h.hash_key(&other), -77);
        assert_ne!(key, other);
    }
}
