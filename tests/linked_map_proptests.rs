// LinkedBucketMap property tests.
//
// Property 1: state-machine equivalence against an ordered Vec model.
//  - Model: Vec<(i64, i32)> in insertion order, plus the positional
//    cursor re-derived from the documented rule (explicit integer keys
//    at or past the cursor pull it to key + 1).
//  - Keys are drawn from a small integer pool and presented randomly as
//    Int or as the equivalent string literal, so the int/int-string
//    bridge is exercised on every path (set, get, unset).
//  - Operations: set, append, unset, get/exists.
//  - After every op: count, membership, value, and full iteration-order
//    parity with the model; at the end, reverse loop order equals the
//    reversed model.
//
// Property 2: prepend insert mode mirrors the model with front
// insertion; overwrites never move an entry.
use linked_bucket_map::{InsertMode, LinkedBucketMap, LoopOrder, MapKey};
use proptest::prelude::*;

fn canonical(key: &MapKey) -> i64 {
    match key {
        MapKey::Int(i) => *i,
        MapKey::Str(s) => s.parse().expect("pool keys are integer literals"),
        other => panic!("unexpected key kind in pool: {:?}", other),
    }
}

fn pool_key(k: i64, as_string: bool) -> MapKey {
    if as_string {
        MapKey::from(k.to_string())
    } else {
        MapKey::Int(k)
    }
}

fn entries(m: &LinkedBucketMap<i32>) -> Vec<(i64, i32)> {
    m.iter().map(|(k, v)| (canonical(k), *v)).collect()
}

proptest! {
    #[test]
    fn prop_model_parity(
        ops in proptest::collection::vec(
            (0u8..=3u8, 0usize..8usize, any::<i32>(), any::<bool>()),
            1..200,
        )
    ) {
        let mut sut: LinkedBucketMap<i32> = LinkedBucketMap::new();
        let mut model: Vec<(i64, i32)> = Vec::new();
        let mut next: i64 = 0;

        for (op, raw_k, v, as_string) in ops {
            let k = raw_k as i64;
            let key = pool_key(k, as_string);
            match op {
                // Set: overwrite in place or append to the model.
                0 => {
                    sut.set(key, v).unwrap();
                    match model.iter_mut().find(|(mk, _)| *mk == k) {
                        Some(entry) => entry.1 = v,
                        None => model.push((k, v)),
                    }
                    if k >= next {
                        next = k + 1;
                    }
                }
                // Positional append lands on the model's cursor.
                1 => {
                    prop_assert!(sut.append(v));
                    match model.iter_mut().find(|(mk, _)| *mk == next) {
                        Some(entry) => entry.1 = v,
                        None => model.push((next, v)),
                    }
                    next += 1;
                }
                // Unset parity: removed iff the model had the key.
                2 => {
                    let removed = sut.unset(&key);
                    let before = model.len();
                    model.retain(|(mk, _)| *mk != k);
                    prop_assert_eq!(removed, model.len() != before);
                }
                // Read parity through either key form.
                3 => {
                    let expected = model.iter().find(|(mk, _)| *mk == k).map(|(_, mv)| mv);
                    prop_assert_eq!(sut.get(&key), expected);
                    prop_assert_eq!(sut.exists(&key), expected.is_some());
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(sut.count(), model.len());
            prop_assert_eq!(entries(&sut), model.clone());
        }

        // Reverse loop order yields exactly the reversed model.
        sut.set_loop_order(LoopOrder::Reverse);
        let mut expected = model.clone();
        expected.reverse();
        prop_assert_eq!(entries(&sut), expected);
    }

    #[test]
    fn prop_prepend_front_inserts(
        ops in proptest::collection::vec((0usize..8usize, any::<i32>(), any::<bool>()), 1..100)
    ) {
        let mut sut: LinkedBucketMap<i32> = LinkedBucketMap::new();
        sut.set_insert_mode(InsertMode::Prepend);
        let mut model: Vec<(i64, i32)> = Vec::new();

        for (raw_k, v, as_string) in ops {
            let k = raw_k as i64;
            sut.set(pool_key(k, as_string), v).unwrap();
            match model.iter_mut().find(|(mk, _)| *mk == k) {
                Some(entry) => entry.1 = v,
                None => model.insert(0, (k, v)),
            }
            prop_assert_eq!(entries(&sut), model.clone());
        }
    }
}
