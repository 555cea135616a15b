//! A tour of the map: every supported key kind, positional appends,
//! the custom hash-code capability, and both iteration surfaces.
//!
//! Run with `cargo run --example tour`.

use linked_bucket_map::{HashCode, InsertMode, LinkedBucketMap, LoopOrder, MapKey};
use std::any::Any;
use std::rc::Rc;

struct CaseInsensitive(String);

impl HashCode for CaseInsensitive {
    fn hash_code(&self) -> i64 {
        self.0
            .to_lowercase()
            .bytes()
            .fold(0i64, |h, b| h.wrapping_mul(31).wrapping_add(i64::from(b)))
    }
}

fn main() {
    let mut map: LinkedBucketMap<String> = LinkedBucketMap::new();

    // Scalar keys of every kind.
    map.set(MapKey::from(true), "bool (true)".into()).unwrap();
    map.set(MapKey::from(false), "bool (false)".into()).unwrap();
    map.set(MapKey::from(32441), "int (32441)".into()).unwrap();
    map.set(MapKey::from(-32441), "int (-32441)".into()).unwrap();
    map.set(MapKey::from(i64::MAX - 100), "int (i64::MAX - 100)".into())
        .unwrap();
    map.set(MapKey::from(i64::MIN), "int (i64::MIN)".into()).unwrap();
    map.set(MapKey::from(0.5), "float (0.5)".into()).unwrap();
    map.set(MapKey::from(-0.5), "float (-0.5)".into()).unwrap();
    map.set(MapKey::from("abc"), "string (abc)".into()).unwrap();
    map.set(
        MapKey::from("The quick brown fox jumps over the lazy dog"),
        "string (pangram)".into(),
    )
    .unwrap();

    // Composite keys: order and nesting matter.
    map.set(
        MapKey::List(vec![MapKey::from(1), MapKey::from(2), MapKey::from(3)]),
        "list ([1, 2, 3])".into(),
    )
    .unwrap();
    map.set(
        MapKey::List(vec![
            MapKey::from(1),
            MapKey::from("a"),
            MapKey::from(false),
            MapKey::List(vec![MapKey::from("f"), MapKey::from(5)]),
        ]),
        "list (nested)".into(),
    )
    .unwrap();

    // Identity-only keys: two equal-looking objects are two entries.
    let resource: Rc<dyn Any> = Rc::new(vec![1u8, 2, 3]);
    map.set(MapKey::Object(resource.clone()), "object (resource)".into())
        .unwrap();

    // A key that hashes itself.
    let custom = MapKey::Hashed(Rc::new(CaseInsensitive("Hello".into())));
    map.set(custom.clone(), "custom-hash key".into()).unwrap();

    // Positional appends number from the cursor.
    map.append("append 0".into());
    map.append("append 1".into());
    map.append("append 2".into());

    println!("count = {}", map.count());
    println!("longest chain walked = {}", map.longest_chain_len());

    // The integer bridge: an int entry is reachable by its string form.
    println!(
        "get(Int(32441))    = {:?}",
        map.get(&MapKey::from(32441))
    );
    println!(
        "get(Str(\"32441\")) = {:?}",
        map.get(&MapKey::from("32441"))
    );

    // Identity: a fresh allocation never aliases the stored resource.
    let other: Rc<dyn Any> = Rc::new(vec![1u8, 2, 3]);
    println!(
        "exists(stored object) = {}, exists(fresh object) = {}",
        map.exists(&MapKey::Object(resource)),
        map.exists(&MapKey::Object(other)),
    );

    println!("\n-- entries, insertion order --");
    for (key, value) in map.iter() {
        println!("{:?} => {}", key, value);
    }

    // The cursor protocol, in reverse.
    map.set_loop_order(LoopOrder::Reverse);
    println!("\n-- entries, reverse order (cursor protocol) --");
    map.rewind();
    while map.valid() {
        println!("{:?} => {}", map.current_key().unwrap(), map.current().unwrap());
        map.next();
    }

    // Prepend mode affects only future inserts.
    map.set_insert_mode(InsertMode::Prepend);
    map.set(MapKey::from("first-now"), "prepended".into()).unwrap();
    map.set_loop_order(LoopOrder::Normal);
    let front = map.iter().next().map(|(k, _)| format!("{:?}", k));
    println!("\nhead after prepend = {:?}", front);
}
