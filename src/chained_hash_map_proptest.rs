#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can run
// the same scenario against every hashing strategy.

use crate::chained_hash_map::ChainedHashMap;
use crate::hash_fns::{BuildHash, Fnv1aHash, KeyHash, PolynomialRollingHash};
use crate::iter::Cursor;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

// Every key lands in bucket 0.
#[derive(Clone, Copy)]
struct ConstHash;
impl<Q: ?Sized> KeyHash<Q> for ConstHash {
    fn hash_key(&self, _key: &Q) -> u64 {
        0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Upsert(usize, i32),
    Erase(usize),
    EraseAt(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Upsert(i, d)),
            2 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::EraseAt),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural invariants that must hold between any two operations:
// - traversal from begin() reaches END after exactly len() distinct entries;
// - every entry sits in the bucket given by bucket_index(key);
// - begin() is the head of the lowest non-empty bucket.
fn check_structure<H>(sut: &ChainedHashMap<Key, i32, H>) -> Result<(), TestCaseError>
where
    H: KeyHash<Key>,
{
    let mut seen = BTreeSet::new();
    let mut c = sut.begin();
    while !c.is_end() {
        prop_assert!(seen.len() < sut.len(), "traversal ran past len()");
        let k = c.key(sut);
        prop_assert!(k.is_some(), "traversal cursor must resolve");
        prop_assert!(seen.insert(k.unwrap().clone()), "entry visited twice");
        c = sut.advance(c);
    }
    prop_assert_eq!(seen.len(), sut.len());

    let mut total = 0;
    for (b, chain) in sut.buckets() {
        for (k, _) in chain {
            prop_assert_eq!(sut.bucket_index(k), b);
            total += 1;
        }
    }
    prop_assert_eq!(total, sut.len());

    let lowest = sut
        .buckets()
        .find_map(|(_, mut chain)| chain.next().map(|(k, _)| k));
    prop_assert_eq!(sut.begin().key(sut), lowest);
    Ok(())
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - First insert wins; duplicates report `inserted == false` and return the live cursor.
// - `get_or_insert_default` inserts at most once and persists writes.
// - `erase` returns 0/1 matching the model; `erase_at` returns `advance(cursor)`.
// - `find`/`contains_key` parity; erased cursors never resolve again.
// - Structural invariants after every step (see `check_structure`).
fn run_scenario<H>(
    bucket_hint: usize,
    hasher: H,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: KeyHash<Key> + KeyHash<str>,
{
    let mut sut: ChainedHashMap<Key, i32, H> =
        ChainedHashMap::with_buckets_and_hasher(bucket_hint, hasher);
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut live: HashMap<Key, Cursor> = HashMap::new();
    let mut stale: Vec<Cursor> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let (c, inserted) = sut.insert(k.clone(), v);
                prop_assert_eq!(inserted, !already);
                if inserted {
                    model.insert(k.clone(), v);
                    live.insert(k, c);
                } else {
                    prop_assert_eq!(Some(&c), live.get(&k));
                    prop_assert_eq!(c.value(&sut), model.get(&k), "duplicate must not overwrite");
                }
            }
            OpI::Upsert(i, d) => {
                let k = key_from(pool, i);
                let v = sut.get_or_insert_default(k.clone());
                *v = v.wrapping_add(d);
                let mv = model.entry(k.clone()).or_default();
                *mv = mv.wrapping_add(d);
                let c = sut.find(&k);
                prop_assert!(!c.is_end());
                let prev = live.insert(k, c);
                prop_assert!(prev.map_or(true, |p| p == c), "cursor must be stable");
            }
            OpI::Erase(i) => {
                let k = key_from(pool, i);
                let removed = sut.erase(k.0.as_str());
                let expected = model.remove(&k).is_some();
                prop_assert_eq!(removed, usize::from(expected));
                if let Some(c) = live.remove(&k) {
                    stale.push(c);
                }
                prop_assert!(sut.find(&k).is_end());
            }
            OpI::EraseAt(i) => {
                let k = key_from(pool, i);
                if let Some(c) = live.remove(&k) {
                    let expected = sut.advance(c);
                    let next = sut.erase_at(c);
                    prop_assert_eq!(next, expected);
                    prop_assert!(model.remove(&k).is_some());
                    stale.push(c);
                } else {
                    prop_assert_eq!(sut.erase_at(Cursor::END), Cursor::END);
                }
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(k.0.as_str());
                prop_assert_eq!(c.is_end(), !model.contains_key(&k));
                if !c.is_end() {
                    prop_assert_eq!(Some(&c), live.get(&k));
                    prop_assert_eq!(c.value(&sut), model.get(&k));
                    prop_assert_eq!(c.key(&sut), Some(&k));
                }
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(v), Some(mv)) => {
                        *v = v.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence must match model"),
                }
            }
            OpI::Iterate => {
                let s_entries: BTreeSet<(Key, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m_entries: BTreeSet<(Key, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_entries, m_entries);
                prop_assert_eq!(sut.iter().len(), model.len());
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, c)| c));
            }
        }

        for &c in &stale {
            prop_assert!(c.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_std_hasher(hint in 0usize..24, (pool, ops) in arb_scenario()) {
        run_scenario(hint, BuildHash(RandomState::new()), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_fnv1a(hint in 0usize..24, (pool, ops) in arb_scenario()) {
        run_scenario(hint, Fnv1aHash, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_polynomial(hint in 0usize..24, (pool, ops) in arb_scenario()) {
        run_scenario(hint, PolynomialRollingHash, &pool, ops)?;
    }

    // Worst case: one chain holds everything. Stresses predecessor
    // relinking and first-node reseating.
    #[test]
    fn prop_state_machine_with_collisions(hint in 0usize..24, (pool, ops) in arb_scenario()) {
        run_scenario(hint, ConstHash, &pool, ops)?;
    }
}

// Property: a clone holds the same entries, is independent of the source,
// and keeps bucket placement.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_matches_source(hint in 0usize..24, keys in proptest::collection::vec("[a-z]{0,6}", 0..40)) {
        let mut m: ChainedHashMap<Key, i32, Fnv1aHash> = ChainedHashMap::with_buckets_and_hasher(hint, Fnv1aHash);
        for (i, k) in keys.iter().enumerate() {
            m.insert(Key(k.clone()), i as i32);
        }
        let mut copy = m.clone();
        prop_assert_eq!(copy.len(), m.len());
        prop_assert_eq!(copy.bucket_count(), m.bucket_count());
        for (k, v) in &m {
            prop_assert_eq!(copy.get(k), Some(v));
        }
        for b in 0..m.bucket_count() {
            prop_assert_eq!(copy.bucket_size(b), m.bucket_size(b));
        }
        check_structure(&copy)?;

        copy.clear();
        prop_assert_eq!(m.iter().count(), m.len());
    }
}
