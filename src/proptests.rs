use super::*;

use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;

fn validate_map(map: &SortedIntMap) {
    assert_eq!(
        map.keys.len(),
        map.values.len(),
        "key and value arrays must stay parallel"
    );
    assert!(
        map.keys.capacity() >= map.keys.len(),
        "capacity must cover the live range"
    );
    for window in map.keys.windows(2) {
        assert!(
            window[0] < window[1],
            "keys must be strictly ascending: {} !< {}",
            window[0],
            window[1]
        );
    }
}

fn hash_of(map: &SortedIntMap) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    map.hash(&mut hasher);
    hasher.finish()
}

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    Get(i32),
    ContainsKey(i32),
    LastKey,
}

fn key_strategy() -> impl Strategy<Value = i32> + Clone {
    // A narrow key range forces overwrites and out-of-order inserts; the
    // sentinel is excluded because stored values must never equal it.
    -64i32..=64
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), -1000i32..=1000).prop_map(|(k, v)| Op::Put(k, v)),
        30 => key.clone().prop_map(Op::Get),
        15 => key.prop_map(Op::ContainsKey),
        5 => Just(Op::LastKey),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in ops_strategy()) {
        let mut map = SortedIntMap::new();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    map.put(key, value);
                    model.insert(key, value);
                }
                Op::Get(key) => {
                    let expected = model.get(&key).copied().unwrap_or(NO_VALUE);
                    prop_assert_eq!(map.get(key), expected);
                }
                Op::ContainsKey(key) => {
                    prop_assert_eq!(map.contains_key(key), model.contains_key(&key));
                }
                Op::LastKey => {
                    let expected = model.keys().next_back().copied().unwrap_or(NO_VALUE);
                    prop_assert_eq!(map.last_key(), expected);
                }
            }

            prop_assert_eq!(map.len(), model.len());
        }

        validate_map(&map);
        let got: Vec<(i32, i32)> = map.iter().collect();
        let expected: Vec<(i32, i32)> = model.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_cursors_match_iter(entries in prop::collection::vec((key_strategy(), -1000i32..=1000), 0..=200)) {
        let map: SortedIntMap = entries.into_iter().collect();
        validate_map(&map);

        let expected: Vec<(i32, i32)> = map.iter().collect();

        let mut keys = Vec::new();
        let mut cursor = map.key_cursor();
        while cursor.has_next(&map).unwrap() {
            keys.push(cursor.next(&map).unwrap());
        }
        prop_assert_eq!(cursor.next(&map), Err(CursorError::Exhausted));
        let expected_keys: Vec<i32> = expected.iter().map(|&(k, _)| k).collect();
        prop_assert_eq!(keys, expected_keys);

        let mut pairs = Vec::new();
        let mut cursor = map.entry_cursor();
        while cursor.has_next(&map).unwrap() {
            cursor.advance(&map).unwrap();
            pairs.push((cursor.key(&map).unwrap(), cursor.value(&map).unwrap()));
        }
        prop_assert_eq!(cursor.advance(&map), Err(CursorError::Exhausted));
        prop_assert_eq!(pairs, expected);
    }

    #[test]
    fn prop_any_put_invalidates_cursors(
        entries in prop::collection::vec((key_strategy(), -1000i32..=1000), 0..=50),
        key in key_strategy(),
        value in -1000i32..=1000,
    ) {
        let mut map: SortedIntMap = entries.into_iter().collect();

        let mut key_cursor = map.key_cursor();
        let mut entry_cursor = map.entry_cursor();

        // Insert or overwrite, either way the checkpoint no longer matches.
        map.put(key, value);

        prop_assert_eq!(key_cursor.has_next(&map), Err(CursorError::Stale));
        prop_assert_eq!(key_cursor.next(&map), Err(CursorError::Stale));
        prop_assert_eq!(entry_cursor.has_next(&map), Err(CursorError::Stale));
        prop_assert_eq!(entry_cursor.advance(&map), Err(CursorError::Stale));
        prop_assert_eq!(entry_cursor.key(&map), Err(CursorError::Stale));
        prop_assert_eq!(entry_cursor.value(&map), Err(CursorError::Stale));
    }

    #[test]
    fn prop_equality_independent_of_insertion_order(
        entries in prop::collection::vec((key_strategy(), -1000i32..=1000), 0..=100),
    ) {
        let forward: SortedIntMap = entries.iter().copied().collect();

        // Rebuild from the final associations in reverse key order.
        let final_entries: Vec<(i32, i32)> = forward.iter().collect();
        let backward: SortedIntMap = final_entries.into_iter().rev().collect();

        validate_map(&forward);
        validate_map(&backward);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
    }
}
