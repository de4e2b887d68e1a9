#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can call the
// structural invariant checker.

use crate::config::TableConfig;
use crate::hash_table::{EntryHandle, HashTable};
use crate::key_hash::KeyHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, pool length
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Delete(usize),
    Get(usize),
    GetStr(String),
    Mutate(usize, i32),
    Resize(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-zA-Z]{0,6}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            8 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Delete),
            3 => idx.clone().prop_map(OpI::Get),
            1 => "[a-zA-Z]{0,6}".prop_map(OpI::GetStr),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..40).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against a std HashMap model. Invariants checked:
// - insert of a new key returns None and keeps load factor within bounds;
//   insert of an existing key returns the previous value and never grows;
// - get/delete parity with the model, delete of absent keys is a no-op;
// - resize(0) is rejected without side effects, resize(n) sets n buckets
//   and keeps every value;
// - handles obtained for live keys keep resolving across growth and resize,
//   and deleted or cleared handles never resolve again;
// - structural invariants (bucket membership, distinct keys, tails, counts)
//   after every operation.
fn run_scenario<H: KeyHasher>(
    mut sut: HashTable<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, EntryHandle> = HashMap::new();
    let mut stale: Vec<EntryHandle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let buckets_before = sut.num_buckets();
                let prev = sut.insert(k, v).expect("insert must not fail");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                if prev.is_some() {
                    prop_assert_eq!(sut.num_buckets(), buckets_before, "update must not grow");
                } else {
                    prop_assert!(
                        sut.load_factor() <= sut.max_load_factor(),
                        "load factor {} above bound after insert",
                        sut.load_factor()
                    );
                    let h = sut.find(k).expect("inserted key resolves");
                    live.insert(k.clone(), h);
                }
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let removed = sut.delete(k);
                prop_assert_eq!(removed, model.remove(k));
                prop_assert!(sut.get(k).is_none());
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
                if let Some(h) = sut.find(k) {
                    prop_assert_eq!(Some(&h), live.get(k), "handle must be stable");
                }
            }
            OpI::GetStr(s) => {
                prop_assert_eq!(sut.get(&s), model.get(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    let v = h.value_mut(&mut sut).expect("live handle resolves");
                    *v = v.wrapping_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(sut.get_mut(k).is_none());
                }
            }
            OpI::Resize(n) => {
                let before = sut.num_buckets();
                match sut.resize(n) {
                    Ok(()) => {
                        prop_assert!(n >= 1);
                        prop_assert_eq!(sut.num_buckets(), n);
                    }
                    Err(_) => {
                        prop_assert_eq!(n, 0);
                        prop_assert_eq!(sut.num_buckets(), before);
                    }
                }
                for (k, v) in &model {
                    prop_assert_eq!(sut.get(k), Some(v));
                }
            }
            OpI::Clear => {
                let before = sut.num_buckets();
                sut.clear();
                prop_assert_eq!(sut.num_buckets(), before);
                for k in model.keys() {
                    prop_assert!(sut.get(k).is_none());
                }
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
            }
            OpI::Iterate => {
                let s: BTreeSet<_> = sut.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                let m: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        sut.assert_invariants();
        for h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        for (k, h) in &live {
            prop_assert_eq!(h.key(&sut), Some(k.as_str()));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), initial in 1usize..8) {
        let sut = HashTable::create(initial).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Every key hashes to the same value, so all entries share one chain.
#[derive(Clone, Default)]
struct ConstHash;
impl KeyHasher for ConstHash {
    fn hash_key(&self, _key: &str) -> i32 {
        -17
    }
}

// Same state machine under worst-case collisions, with a negative hash to
// exercise the Euclidean bucket index.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), initial in 1usize..8) {
        let config = TableConfig::new().with_initial_buckets(initial);
        let sut = HashTable::with_config_and_hasher(config, ConstHash).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}
