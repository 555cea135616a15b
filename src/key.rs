//! MapKey: the heterogeneous key model and the custom hash-code capability.

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// Capability for keys that compute their own hash code.
///
/// A key stored as [`MapKey::Hashed`] is hashed with the value returned by
/// `hash_code`, verbatim; the default structural hasher is never invoked
/// for it. Two `Hashed` keys denote the same entry only when they are the
/// same allocation (`Rc` identity); sharing a hash code merely places
/// them on the same collision chain.
pub trait HashCode {
    /// The hash to use for this key, as-is.
    fn hash_code(&self) -> i64;
}

/// A key of any supported kind.
///
/// Equality (`PartialEq`) is strict identity: same variant, equal payload.
/// Lists compare recursively element-wise; `Object` and `Hashed` compare
/// by `Rc` pointer identity; floats compare by IEEE `==`, so NaN never
/// equals anything (such keys are rejected at insert time) and `0.0`
/// equals `-0.0`.
///
/// The container additionally reconciles an `Int` with a `Str` holding the
/// same integer literal (see [`MapKey::same_entry`]); that bridge is part
/// of entry identity, not of `PartialEq`, and never applies to elements
/// nested inside a `List`.
#[derive(Clone)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Composite key; hashing is sensitive to element order and nesting.
    List(Vec<MapKey>),
    /// Identity-only key (an object, file handle, closure, ...): equality
    /// and hashing follow the allocation, not the contents.
    Object(Rc<dyn Any>),
    /// Key carrying the custom hash-code capability.
    Hashed(Rc<dyn HashCode>),
}

const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STR: u8 = 4;
const TAG_LIST: u8 = 5;
const TAG_OBJECT: u8 = 6;
const TAG_HASHED: u8 = 7;

impl MapKey {
    /// The integer this key represents, if any: an `Int`, or a `Str` whose
    /// full content is an in-range integer literal. Everything else
    /// (bools, floats, lists, objects) is not integer-representable.
    pub(crate) fn as_int(&self) -> Option<i64> {
        match self {
            MapKey::Int(i) => Some(*i),
            MapKey::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Entry identity: strict equality, or the integer/integer-string
    /// bridge. Hashes must already have been compared by the caller.
    pub(crate) fn same_entry(&self, other: &MapKey) -> bool {
        if self == other {
            return true;
        }
        match (self.as_int(), other.as_int()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether the key's identity can be matched deterministically. A NaN
    /// float (anywhere in the key) never equals anything, so storing it
    /// would create an unretrievable entry; inserts reject such keys.
    pub(crate) fn is_stable(&self) -> bool {
        match self {
            MapKey::Float(f) => !f.is_nan(),
            MapKey::List(items) => items.iter().all(MapKey::is_stable),
            _ => true,
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapKey::Bool(a), MapKey::Bool(b)) => a == b,
            (MapKey::Int(a), MapKey::Int(b)) => a == b,
            (MapKey::Float(a), MapKey::Float(b)) => a == b,
            (MapKey::Str(a), MapKey::Str(b)) => a == b,
            (MapKey::List(a), MapKey::List(b)) => a == b,
            (MapKey::Object(a), MapKey::Object(b)) => Rc::ptr_eq(a, b),
            (MapKey::Hashed(a), MapKey::Hashed(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            MapKey::Bool(b) => {
                state.write_u8(TAG_BOOL);
                state.write_u8(*b as u8);
            }
            MapKey::Int(i) => {
                state.write_u8(TAG_INT);
                state.write_i64(*i);
            }
            MapKey::Float(f) => {
                state.write_u8(TAG_FLOAT);
                // -0.0 == 0.0, so both must hash alike.
                let f = if *f == 0.0 { 0.0 } else { *f };
                state.write_u64(f.to_bits());
            }
            MapKey::Str(s) => {
                state.write_u8(TAG_STR);
                s.hash(state);
            }
            MapKey::List(items) => {
                state.write_u8(TAG_LIST);
                state.write_usize(items.len());
                for item in items {
                    item.hash(state);
                }
            }
            MapKey::Object(o) => {
                state.write_u8(TAG_OBJECT);
                state.write_usize(Rc::as_ptr(o) as *const () as usize);
            }
            MapKey::Hashed(h) => {
                state.write_u8(TAG_HASHED);
                state.write_i64(h.hash_code());
            }
        }
    }
}

impl fmt::Debug for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            MapKey::Int(i) => f.debug_tuple("Int").field(i).finish(),
            MapKey::Float(x) => f.debug_tuple("Float").field(x).finish(),
            MapKey::Str(s) => f.debug_tuple("Str").field(s).finish(),
            MapKey::List(items) => f.debug_tuple("List").field(items).finish(),
            MapKey::Object(o) => write!(f, "Object({:p})", Rc::as_ptr(o)),
            MapKey::Hashed(h) => write!(f, "Hashed({:p})", Rc::as_ptr(h)),
        }
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Bool(b)
    }
}

impl From<i32> for MapKey {
    fn from(i: i32) -> Self {
        MapKey::Int(i64::from(i))
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Int(i)
    }
}

impl From<f64> for MapKey {
    fn from(f: f64) -> Self {
        MapKey::Float(f)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Str(s)
    }
}

impl From<Vec<MapKey>> for MapKey {
    fn from(items: Vec<MapKey>) -> Self {
        MapKey::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: strict equality is per-variant; no cross-variant match
    /// even for numerically equal payloads.
    #[test]
    fn strict_equality_is_per_variant() {
        assert_eq!(MapKey::Int(5), MapKey::Int(5));
        assert_ne!(MapKey::Int(5), MapKey::Str("5".to_string()));
        assert_ne!(MapKey::Int(1), MapKey::Bool(true));
        assert_ne!(MapKey::Int(5), MapKey::Float(5.0));
        assert_ne!(MapKey::Int(5), MapKey::Int(6));
    }

    /// Invariant: list equality is recursive and order-sensitive.
    #[test]
    fn list_equality_recursive_and_ordered() {
        let a = MapKey::List(vec![MapKey::Int(1), MapKey::Str("x".to_string())]);
        let b = MapKey::List(vec![MapKey::Int(1), MapKey::Str("x".to_string())]);
        let c = MapKey::List(vec![MapKey::Str("x".to_string()), MapKey::Int(1)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // Nested elements do not bridge int and int-string.
        let d = MapKey::List(vec![MapKey::Str("1".to_string())]);
        let e = MapKey::List(vec![MapKey::Int(1)]);
        assert_ne!(d, e);
    }

    /// Invariant: object keys compare by allocation identity, not type or
    /// contents.
    #[test]
    fn object_identity() {
        let a: Rc<dyn Any> = Rc::new(7i32);
        let b: Rc<dyn Any> = Rc::new(7i32);
        assert_eq!(MapKey::Object(a.clone()), MapKey::Object(a.clone()));
        assert_ne!(MapKey::Object(a), MapKey::Object(b));
    }

    /// Invariant: floats follow IEEE equality: NaN equals nothing (and is
    /// flagged unstable), while 0.0 and -0.0 are the same key and hash
    /// alike.
    #[test]
    fn float_edge_cases() {
        assert_ne!(MapKey::Float(f64::NAN), MapKey::Float(f64::NAN));
        assert!(!MapKey::Float(f64::NAN).is_stable());
        assert!(!MapKey::List(vec![MapKey::Float(f64::NAN)]).is_stable());
        assert!(MapKey::Float(0.5).is_stable());

        assert_eq!(MapKey::Float(0.0), MapKey::Float(-0.0));
        let h = std::collections::hash_map::RandomState::new();
        use core::hash::BuildHasher;
        assert_eq!(h.hash_one(MapKey::Float(0.0)), h.hash_one(MapKey::Float(-0.0)));
    }

    /// Invariant: `as_int` accepts ints and in-range integer literals only.
    #[test]
    fn int_representation_probe() {
        assert_eq!(MapKey::Int(-3).as_int(), Some(-3));
        assert_eq!(MapKey::Str("42".to_string()).as_int(), Some(42));
        assert_eq!(MapKey::Str("-42".to_string()).as_int(), Some(-42));
        assert_eq!(MapKey::Str("+5".to_string()).as_int(), Some(5));
        assert_eq!(MapKey::Str("05".to_string()).as_int(), Some(5));
        assert_eq!(MapKey::Str("4.2".to_string()).as_int(), None);
        assert_eq!(MapKey::Str(" 42".to_string()).as_int(), None);
        assert_eq!(MapKey::Str("42x".to_string()).as_int(), None);
        // Out of range: one past i64::MAX.
        assert_eq!(MapKey::Str("9223372036854775808".to_string()).as_int(), None);
        assert_eq!(MapKey::Bool(true).as_int(), None);
        assert_eq!(MapKey::Float(5.0).as_int(), None);
    }

    /// Invariant: `same_entry` is strict equality plus the int bridge, and
    /// nothing more.
    #[test]
    fn same_entry_bridges_int_and_int_string() {
        let five = MapKey::Int(5);
        let five_s = MapKey::Str("5".to_string());
        assert!(five.same_entry(&five_s));
        assert!(five_s.same_entry(&five));
        assert!(!five.same_entry(&MapKey::Str("05x".to_string())));
        assert!(!five.same_entry(&MapKey::Float(5.0)));
        assert!(!MapKey::Bool(true).same_entry(&MapKey::Int(1)));
    }
}
