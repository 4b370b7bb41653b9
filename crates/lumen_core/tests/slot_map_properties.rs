//! # Slot Map Property Tests
//!
//! Random insert/remove sequences checked against a simple model.
//!
//! Run with: cargo test --package lumen_core --test slot_map_properties

use std::collections::HashMap;

use lumen_core::{Key, SlotMap};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u32),
    /// Removes the n-th key ever issued (modulo the number issued).
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Insert),
        2 => any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn stale_keys_never_resolve(ops in prop::collection::vec(op(), 1..200)) {
        let mut map: SlotMap<u32> = SlotMap::new();
        let mut issued: Vec<Key> = Vec::new();
        let mut live: HashMap<Key, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(value) => {
                    let key = map.insert(value).unwrap();
                    prop_assert!(key.is_valid());
                    prop_assert!(!issued.contains(&key), "key {} issued twice", key);
                    issued.push(key);
                    live.insert(key, value);
                }
                Op::Remove(n) if !issued.is_empty() => {
                    let key = issued[n % issued.len()];
                    let expected = live.remove(&key);
                    prop_assert_eq!(map.remove(key), expected);
                }
                Op::Remove(_) => {}
            }

            prop_assert!(map.validate().is_ok());
            prop_assert_eq!(map.len(), live.len());
        }

        for key in &issued {
            prop_assert_eq!(map.get(*key), live.get(key));
        }
    }

    #[test]
    fn packed_data_holds_exactly_the_live_values(
        values in prop::collection::vec(any::<u32>(), 1..100),
        removals in prop::collection::vec(any::<usize>(), 0..100),
    ) {
        let mut map: SlotMap<u32> = SlotMap::new();
        let keys: Vec<Key> = values.iter().map(|v| map.insert(*v).unwrap()).collect();
        let mut removed = vec![false; keys.len()];

        for r in removals {
            let i = r % keys.len();
            let before: Vec<(Key, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
            let was_live = map.remove(keys[i]).is_some();
            prop_assert_eq!(was_live, !removed[i]);
            removed[i] = true;

            // At most one surviving element changed packed position.
            let moved = before
                .iter()
                .filter(|(k, _)| *k != keys[i])
                .filter(|(k, _)| {
                    let old = before.iter().position(|(o, _)| o == k);
                    let new = map.keys().position(|n| n == *k);
                    old != new
                })
                .count();
            prop_assert!(moved <= 1);
        }

        let mut expected: Vec<u32> = values
            .iter()
            .zip(&removed)
            .filter(|(_, r)| !**r)
            .map(|(v, _)| *v)
            .collect();
        let mut actual = map.as_slice().to_vec();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);

        for packed in 0..map.len() {
            let key = map.key_of(packed).unwrap();
            prop_assert_eq!(map.get(key), map.data_at(packed));
        }
    }
}
