// HashMap property tests.
//
// Property 1: dictionary equivalence.
//  - Model: BTreeMap<u16, u32>.
//  - Operations: insert, get_mut increment, erase, erase_at(find), lookup.
//  - Invariant after every step: len() matches the model and the touched key
//    reads back the model's value; at the end every model entry is found and
//    the cursor walk yields exactly the model's contents.
//
// Property 2: the load bound.
//  - After any sequence of inserts and erases, len() <= fill_threshold()
//    and fill_threshold() == floor(0.7 * capacity()).
//
// Property 3: colliding strategies.
//  - A strategy that maps keys into a handful of hashes keeps long probe
//    chains full of tombstones; the map must still agree with the model.
use std::collections::BTreeMap;

use lin_hash::HashMap;
use lin_hash::HashStrategy;
use lin_hash::TableError;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Increment(u16),
    Erase(u16),
    EraseAt(u16),
    Get(u16),
}

fn op_strategy(key_space: u16) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..key_space, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..key_space).prop_map(Op::Increment),
        2 => (0..key_space).prop_map(Op::Erase),
        1 => (0..key_space).prop_map(Op::EraseAt),
        2 => (0..key_space).prop_map(Op::Get),
    ]
}

fn low_bits(bytes: &[u8]) -> u32 {
    (bytes[0] & 0x3) as u32
}

fn run_against_model(
    map: &mut HashMap<u16, u32>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeMap<u16, u32> = BTreeMap::new();

    for op in ops {
        let key = match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                k
            }
            Op::Increment(k) => {
                let slot = map.get_mut(k);
                *slot = slot.wrapping_add(1);
                let expected = model.entry(k).or_default();
                *expected = expected.wrapping_add(1);
                k
            }
            Op::Erase(k) => {
                let expected = if model.remove(&k).is_some() {
                    Ok(())
                } else {
                    Err(TableError::NotFound)
                };
                prop_assert_eq!(map.erase(&k), expected);
                k
            }
            Op::EraseAt(k) => {
                let cursor = map.find(&k);
                if model.remove(&k).is_some() {
                    prop_assert_ne!(cursor, map.end());
                    prop_assert_eq!(map.erase_at(cursor), Ok(()));
                } else {
                    prop_assert_eq!(cursor, map.end());
                    prop_assert!(map.erase_at(cursor).is_err());
                }
                k
            }
            Op::Get(k) => {
                prop_assert_eq!(map.get(&k).ok(), model.get(&k));
                k
            }
        };

        prop_assert_eq!(map.len(), model.len());
        prop_assert_eq!(map.get(&key).ok(), model.get(&key));
    }

    for (k, v) in &model {
        prop_assert_eq!(map.get(k), Ok(v));
    }

    let mut walked = BTreeMap::new();
    let mut cursor = map.begin();
    while cursor != map.end() {
        let (k, v) = map.entry_at(cursor).unwrap();
        prop_assert!(walked.insert(*k, *v).is_none(), "key {} visited twice", k);
        cursor = map.advance(cursor);
    }
    prop_assert_eq!(walked, model);
    Ok(())
}

proptest! {
    #[test]
    fn prop_matches_btreemap(ops in proptest::collection::vec(op_strategy(64), 1..400)) {
        let mut map = HashMap::new();
        run_against_model(&mut map, ops)?;
    }

    #[test]
    fn prop_matches_btreemap_every_strategy(
        strategy_index in 0..HashStrategy::BUILTIN.len(),
        ops in proptest::collection::vec(op_strategy(512), 1..600),
    ) {
        let mut map = HashMap::with_strategy(HashStrategy::BUILTIN[strategy_index]);
        run_against_model(&mut map, ops)?;
    }

    #[test]
    fn prop_matches_btreemap_with_collisions(ops in proptest::collection::vec(op_strategy(40), 1..400)) {
        let mut map = HashMap::with_strategy(HashStrategy::Custom(low_bits));
        run_against_model(&mut map, ops)?;
    }

    #[test]
    fn prop_load_bound(keys in proptest::collection::vec((any::<u32>(), any::<bool>()), 0..800)) {
        let mut map = HashMap::new();
        for (k, erase) in keys {
            if erase {
                let _ = map.erase(&k);
            } else {
                map.insert(k, ());
            }
            prop_assert!(map.len() <= map.fill_threshold());
            prop_assert_eq!(map.fill_threshold(), map.capacity() * 7 / 10);
            prop_assert!(map.capacity().is_power_of_two());
        }
    }
}
