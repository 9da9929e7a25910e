//! ChainedHashMap: separate chaining over a fixed, prime-sized bucket array.

use crate::error::TableError;
use crate::hash_fns::{BuildHash, DefaultEq, KeyEq, KeyHash};
use crate::iter::{BucketIter, Buckets, Cursor, Iter, Keys, Values};
use crate::primes::{checked_next_prime, next_prime};
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::ops::Index;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};

/// One chained entry. `next` links to the following node of the same bucket.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) next: Option<DefaultKey>,
}

pub struct ChainedHashMap<K, V, H = BuildHash, E = DefaultEq> {
    hasher: H,
    key_eq: E,
    buckets: Box<[Option<DefaultKey>]>, // chain heads, fixed length
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    first: Option<DefaultKey>, // where global iteration starts
}

/// Where a key lives, or would live, in its bucket's chain.
struct Probe {
    bucket: usize,
    prev: Option<DefaultKey>,
    found: Option<DefaultKey>,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Table with `next_prime(bucket_hint)` buckets and the std hasher.
    pub fn with_buckets(bucket_hint: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_hint, BuildHash::default())
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHash<K>,
{
    pub fn with_buckets_and_hasher(bucket_hint: usize, hasher: H) -> Self {
        Self::with_buckets_hasher_and_eq(bucket_hint, hasher, DefaultEq)
    }
}

// Operations that never call the hasher or the key predicate.
impl<K, V, H, E> ChainedHashMap<K, V, H, E> {
    pub fn with_buckets_hasher_and_eq(bucket_hint: usize, hasher: H, key_eq: E) -> Self {
        let bucket_count = next_prime(bucket_hint);
        Self::from_buckets(
            bucket_hint,
            vec![None; bucket_count].into_boxed_slice(),
            hasher,
            key_eq,
        )
    }

    /// Like [`with_buckets_hasher_and_eq`](Self::with_buckets_hasher_and_eq),
    /// but reports bucket-array allocation failure instead of aborting.
    pub fn try_with_buckets_hasher_and_eq(
        bucket_hint: usize,
        hasher: H,
        key_eq: E,
    ) -> Result<Self, TableError> {
        let bucket_count = checked_next_prime(bucket_hint).ok_or(TableError::CapacityOverflow {
            requested: bucket_hint,
        })?;
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize(bucket_count, None);
        Ok(Self::from_buckets(
            bucket_hint,
            buckets.into_boxed_slice(),
            hasher,
            key_eq,
        ))
    }

    fn from_buckets(
        bucket_hint: usize,
        buckets: Box<[Option<DefaultKey>]>,
        hasher: H,
        key_eq: E,
    ) -> Self {
        debug!(
            "chained hash map: requested {} buckets, using {}",
            bucket_hint,
            buckets.len()
        );
        Self {
            hasher,
            key_eq,
            buckets,
            nodes: SlotMap::with_key(),
            first: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Average chain length, `len / bucket_count`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    fn bucket_for_hash(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Number of entries chained in bucket `n`; 0 when `n` is out of range.
    pub fn bucket_size(&self, n: usize) -> usize {
        self.bucket(n).count()
    }

    /// Iterator over bucket `n`'s chain, newest entry first. Empty when `n`
    /// is out of range.
    pub fn bucket(&self, n: usize) -> BucketIter<'_, K, V> {
        BucketIter {
            nodes: &self.nodes,
            next: self.buckets.get(n).copied().flatten(),
        }
    }

    /// Every bucket with its chain, in index order.
    pub fn buckets(&self) -> Buckets<'_, K, V> {
        Buckets {
            nodes: &self.nodes,
            slots: self.buckets.iter().enumerate(),
        }
    }

    pub fn begin(&self) -> Cursor {
        Cursor(self.first)
    }

    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// The cursor after `cursor`: next node in the same chain, else the head
    /// of the next non-empty bucket, else `END`. End and stale cursors
    /// advance to `END`.
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        let Some(node) = self.node_at(cursor) else {
            return Cursor::END;
        };
        if let Some(next) = node.next {
            return Cursor::at(next);
        }
        let start = self.bucket_for_hash(node.hash) + 1;
        Cursor(self.buckets[start..].iter().find_map(|head| *head))
    }

    pub fn iter(&self) -> Iter<'_, K, V, H, E> {
        Iter {
            map: self,
            cursor: self.begin(),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, H, E> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, H, E> {
        Values { inner: self.iter() }
    }

    /// Drops every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        debug!("chained hash map: clearing {} entries", self.len());
        self.nodes.clear();
        self.buckets.fill(None);
        self.first = None;
    }

    /// Removes the entry under `cursor` and returns the cursor that followed
    /// it. `END` or a stale cursor is a no-op returning `END`.
    pub fn erase_at(&mut self, cursor: Cursor) -> Cursor {
        let Some(k) = cursor.raw() else {
            return Cursor::END;
        };
        let Some(node) = self.nodes.get(k) else {
            return Cursor::END;
        };
        let bucket = self.bucket_for_hash(node.hash);
        let mut prev = None;
        let mut walk = self.buckets[bucket];
        while let Some(w) = walk {
            if w == k {
                break;
            }
            prev = Some(w);
            walk = self.nodes[w].next;
        }
        let next = self.advance(cursor);
        self.unlink(bucket, prev, k);
        next
    }

    /// Detaches node `k` from `bucket`, `prev` being its chain predecessor.
    fn unlink(&mut self, bucket: usize, prev: Option<DefaultKey>, k: DefaultKey) -> (K, V) {
        // Reseat the start of iteration before the node goes away.
        if self.first == Some(k) {
            self.first = self.advance(Cursor::at(k)).raw();
            trace!("chained hash map: first node reseated after erase in bucket {bucket}");
        }
        let node = self.nodes.remove(k).expect("unlinked node must be live");
        match prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.buckets[bucket] = node.next,
        }
        (node.key, node.value)
    }

    /// Splices a new node at the head of `bucket` and updates the first node.
    fn link_front(&mut self, bucket: usize, key: K, value: V, hash: u64) -> DefaultKey {
        let head = self.buckets[bucket];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next: head,
        });
        self.buckets[bucket] = Some(k);
        let becomes_first = match self.first {
            None => true,
            Some(f) => bucket <= self.bucket_for_hash(self.nodes[f].hash),
        };
        if becomes_first {
            self.first = Some(k);
        }
        k
    }

    pub(crate) fn node_at(&self, cursor: Cursor) -> Option<&Node<K, V>> {
        self.nodes.get(cursor.raw()?)
    }

    pub(crate) fn node_at_mut(&mut self, cursor: Cursor) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(cursor.raw()?)
    }

    /// Moves the contents out, leaving an empty table with the same bucket
    /// count, hasher and key predicate behind.
    pub fn take(&mut self) -> Self
    where
        H: Clone,
        E: Clone,
    {
        let empty = Self {
            hasher: self.hasher.clone(),
            key_eq: self.key_eq.clone(),
            buckets: vec![None; self.buckets.len()].into_boxed_slice(),
            nodes: SlotMap::with_key(),
            first: None,
        };
        core::mem::replace(self, empty)
    }
}

impl<K, V, H, E> ChainedHashMap<K, V, H, E>
where
    H: KeyHash<K>,
    E: KeyEq<K>,
{
    fn probe<Q>(&self, bucket: usize, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEq<Q>,
    {
        let mut prev = None;
        let mut walk = self.buckets[bucket];
        while let Some(k) = walk {
            let node = &self.nodes[k];
            if self.key_eq.eq_keys(node.key.borrow(), q) {
                return Probe {
                    bucket,
                    prev,
                    found: Some(k),
                };
            }
            prev = Some(k);
            walk = node.next;
        }
        Probe {
            bucket,
            prev,
            found: None,
        }
    }

    fn probe_key<Q>(&self, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        let bucket = self.bucket_for_hash(self.hasher.hash_key(q));
        self.probe(bucket, q)
    }

    /// `hash(key) mod bucket_count()`.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
    {
        self.bucket_for_hash(self.hasher.hash_key(q))
    }

    /// Inserts `key -> value` unless an equal key is present. Returns the
    /// cursor to the stored entry and whether it was newly inserted. An
    /// existing entry is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        self.insert_with(key, || value)
    }

    /// Like [`insert`](Self::insert); `default()` only runs when inserting.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        let hash = self.hasher.hash_key(&key);
        let bucket = self.bucket_for_hash(hash);
        if let Some(k) = self.probe(bucket, &key).found {
            return (Cursor::at(k), false);
        }
        let value = default();
        (Cursor::at(self.link_front(bucket, key, value, hash)), true)
    }

    /// Value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let (cursor, _) = self.insert_with(key, default);
        cursor
            .value_mut(self)
            .expect("entry must exist immediately after insert")
    }

    /// Value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Cursor to the entry whose key equals `q`, or `END`.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        Cursor(self.probe_key(q).found)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        self.probe_key(q).found.is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        self.find(q).value(self)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        let cursor = self.find(q);
        cursor.value_mut(self)
    }

    /// Removes the entry for `q`; returns how many were removed (0 or 1).
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        usize::from(self.remove_entry(q).is_some())
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q>,
    {
        let Probe { bucket, prev, found } = self.probe_key(q);
        Some(self.unlink(bucket, prev, found?))
    }
}

/// Deep copy by re-insertion: buckets in index order, each chain head to
/// tail. Chains of the copy come out in reverse.
impl<K, V, H, E> Clone for ChainedHashMap<K, V, H, E>
where
    K: Clone,
    V: Clone,
    H: KeyHash<K> + Clone,
    E: KeyEq<K> + Clone,
{
    fn clone(&self) -> Self {
        let mut copy = Self::from_buckets(
            self.buckets.len(),
            vec![None; self.buckets.len()].into_boxed_slice(),
            self.hasher.clone(),
            self.key_eq.clone(),
        );
        for (_, chain) in self.buckets() {
            for (k, v) in chain {
                copy.insert(k.clone(), v.clone());
            }
        }
        copy
    }
}

impl<K, V, H, E> Extend<(K, V)> for ChainedHashMap<K, V, H, E>
where
    H: KeyHash<K>,
    E: KeyEq<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a ChainedHashMap<K, V, H, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, H, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, Q, V, H, E> Index<&Q> for ChainedHashMap<K, V, H, E>
where
    K: Borrow<Q>,
    Q: ?Sized,
    H: KeyHash<K> + KeyHash<Q>,
    E: KeyEq<K> + KeyEq<Q>,
{
    type Output = V;

    /// # Panics
    /// If the key is not present.
    fn index(&self, q: &Q) -> &V {
        self.get(q).expect("key not present in ChainedHashMap")
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E> fmt::Debug for ChainedHashMap<K, V, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_fns::{Fnv1aHash, PolynomialRollingHash};
    use std::cell::Cell;
    use std::collections::BTreeSet;

    fn const_hash(_: &String) -> u64 {
        0
    }

    #[test]
    fn bucket_count_is_next_prime() {
        let m: ChainedHashMap<String, i32> = ChainedHashMap::with_buckets(10);
        assert_eq!(m.bucket_count(), 11);
        let m: ChainedHashMap<String, i32> = ChainedHashMap::with_buckets(5);
        assert_eq!(m.bucket_count(), 5);
        let m: ChainedHashMap<String, i32> = ChainedHashMap::with_buckets(0);
        assert!(m.bucket_count() >= 1);
        assert!(m.is_empty());
        assert_eq!(m.begin(), m.end());
    }

    /// Invariant: duplicate inserts report `false` and keep the first value.
    #[test]
    fn first_insert_wins() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(7, Fnv1aHash);
        let (c1, inserted) = m.insert("dup".to_string(), 1);
        assert!(inserted);
        let (c2, inserted) = m.insert("dup".to_string(), 2);
        assert!(!inserted);
        assert_eq!(c1, c2);
        assert_eq!(c1.value(&m), Some(&1));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: chains are LIFO; the newest colliding entry is the bucket head.
    #[test]
    fn chain_order_is_newest_first() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(3, const_hash);
        for k in ["a", "b", "c"] {
            m.insert(k.to_string(), 0);
        }
        let chain: Vec<&str> = m.bucket(0).map(|(k, _)| k.as_str()).collect();
        assert_eq!(chain, ["c", "b", "a"]);
        let order: Vec<&str> = m.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
    }

    /// Invariant: global traversal is ascending by bucket index.
    #[test]
    fn iteration_is_bucket_ordered() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(101, PolynomialRollingHash);
        for i in 0..200 {
            m.insert(format!("key{i}"), i);
        }
        let indices: Vec<usize> = m.keys().map(|k| m.bucket_index(k)).collect();
        assert_eq!(indices.len(), 200);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Invariant: inserting into a higher bucket does not move the start of
    /// iteration; inserting into a lower or equal bucket does.
    #[test]
    fn first_node_tracks_lowest_bucket() {
        let bucket_of = |s: &String| s.parse::<u64>().unwrap_or(0);
        let mut m = ChainedHashMap::with_buckets_and_hasher(11, bucket_of);
        m.insert("5".to_string(), ());
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("5"));
        m.insert("8".to_string(), ());
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("5"));
        m.insert("2".to_string(), ());
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("2"));
        m.insert("13".to_string(), ()); // 13 mod 11 == 2
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("13"));

        // Erasing the first node reseats to what iteration visits next.
        assert_eq!(m.erase(&"13".to_string()), 1);
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("2"));
        assert_eq!(m.erase(&"2".to_string()), 1);
        assert_eq!(m.begin().key(&m).map(String::as_str), Some("5"));
        let rest: Vec<&str> = m.keys().map(|k| k.as_str()).collect();
        assert_eq!(rest, ["5", "8"]);
    }

    #[test]
    fn erase_middle_of_chain_keeps_links() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(2, const_hash);
        for k in ["a", "b", "c", "d"] {
            m.insert(k.to_string(), 0);
        }
        assert_eq!(m.erase(&"b".to_string()), 1);
        let chain: Vec<&str> = m.bucket(0).map(|(k, _)| k.as_str()).collect();
        assert_eq!(chain, ["d", "c", "a"]);
        assert_eq!(m.erase(&"d".to_string()), 1);
        let chain: Vec<&str> = m.bucket(0).map(|(k, _)| k.as_str()).collect();
        assert_eq!(chain, ["c", "a"]);
        assert_eq!(m.erase(&"zzz".to_string()), 0);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn erase_at_returns_following_cursor() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(13, Fnv1aHash);
        for i in 0..20 {
            m.insert(format!("k{i}"), i);
        }
        let order: Vec<String> = m.keys().cloned().collect();
        let mut c = m.find(order[5].as_str());
        c = m.erase_at(c);
        assert_eq!(c.key(&m), Some(&order[6]));
        assert_eq!(m.len(), 19);

        // Erase everything by walking from begin.
        let mut c = m.begin();
        while !c.is_end() {
            c = m.erase_at(c);
        }
        assert!(m.is_empty());
        assert_eq!(m.begin(), m.end());
        assert_eq!(m.erase_at(m.end()), Cursor::END);
    }

    /// Invariant: a cursor to an erased entry goes stale and never aliases.
    #[test]
    fn stale_cursor_does_not_resolve() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(5, Fnv1aHash);
        let (c, _) = m.insert("old".to_string(), 1);
        assert_eq!(m.erase("old"), 1);
        let (c2, _) = m.insert("new".to_string(), 2);
        assert_ne!(c, c2);
        assert!(c.value(&m).is_none());
        assert_eq!(m.advance(c), Cursor::END);
        assert_eq!(m.erase_at(c), Cursor::END);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn get_or_insert_default_round_trip() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_buckets(7);
        *m.get_or_insert_default("x".to_string()) = 42;
        assert_eq!(m.get("x"), Some(&42));
        assert_eq!(m["x"], 42);
        *m.get_or_insert_default("x".to_string()) += 1;
        assert_eq!(m["x"], 43);
        assert_eq!(*m.get_or_insert_default("y".to_string()), 0);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn insert_with_is_lazy() {
        let mut m: ChainedHashMap<String, String> = ChainedHashMap::with_buckets(7);
        let calls = Cell::new(0);
        let (_, inserted) = m.insert_with("k".to_string(), || {
            calls.set(calls.get() + 1);
            "v".to_string()
        });
        assert!(inserted);
        let (_, inserted) = m.insert_with("k".to_string(), || {
            calls.set(calls.get() + 1);
            "v2".to_string()
        });
        assert!(!inserted);
        assert_eq!(calls.get(), 1, "default() must not run on duplicate");
        assert_eq!(m.get("k").map(String::as_str), Some("v"));
    }

    /// Invariant: matching uses the key predicate, not hash equality.
    #[test]
    fn custom_equality_predicate() {
        let hash = |s: &String| crate::hash_fns::fnv1a(s.to_ascii_lowercase().as_bytes());
        let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        let mut m = ChainedHashMap::with_buckets_hasher_and_eq(7, hash, eq);
        assert!(m.insert("Hello".to_string(), 1).1);
        assert!(!m.insert("HELLO".to_string(), 2).1);
        assert_eq!(m.get(&"hello".to_string()), Some(&1));
        assert_eq!(m.erase(&"hElLo".to_string()), 1);
        assert!(m.is_empty());
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(17, Fnv1aHash);
        for i in 0..30 {
            m.insert(format!("{i}"), i);
        }
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.bucket_count(), 17);
        assert_eq!(m.begin(), m.end());
        assert!((0..17).all(|b| m.bucket_size(b) == 0));
        m.insert("again".to_string(), 1);
        assert_eq!(m.iter().count(), 1);
    }

    #[test]
    fn clone_is_deep_and_reverses_chains() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(1, const_hash);
        for k in ["a", "b", "c"] {
            m.insert(k.to_string(), k.len());
        }
        let mut copy = m.clone();
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.bucket_count(), m.bucket_count());
        let chain: Vec<&str> = copy.bucket(0).map(|(k, _)| k.as_str()).collect();
        assert_eq!(chain, ["a", "b", "c"]);
        *copy.get_mut(&"a".to_string()).unwrap() = 99;
        assert_eq!(m.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn take_leaves_empty_table() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(11, Fnv1aHash);
        m.insert("a".to_string(), 1);
        let moved = m.take();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved.get("a"), Some(&1));
        assert!(m.is_empty());
        assert_eq!(m.bucket_count(), 11);
        assert!(m.find("a").is_end());
        m.insert("b".to_string(), 2);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn load_factor_and_out_of_range_bucket() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(5, Fnv1aHash);
        assert_eq!(m.load_factor(), 0.0);
        m.extend(["a", "b", "c", "d", "e"].map(|k| (k.to_string(), ())));
        assert_eq!(m.load_factor(), 1.0);
        assert_eq!(m.bucket_size(5), 0);
        assert_eq!(m.bucket(1000).count(), 0);
        let total: usize = (0..m.bucket_count()).map(|b| m.bucket_size(b)).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn debug_lists_entries_in_iteration_order() {
        let mut m = ChainedHashMap::with_buckets_and_hasher(3, const_hash);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        assert_eq!(format!("{m:?}"), r#"{"b": 2, "a": 1}"#);
    }

    #[test]
    fn try_constructor_reports_overflow() {
        let r = ChainedHashMap::<String, i32, _, _>::try_with_buckets_hasher_and_eq(
            usize::MAX,
            Fnv1aHash,
            DefaultEq,
        );
        assert!(matches!(r, Err(TableError::CapacityOverflow { requested }) if requested == usize::MAX));

        let m = ChainedHashMap::<String, i32, _, _>::try_with_buckets_hasher_and_eq(
            8,
            Fnv1aHash,
            DefaultEq,
        )
        .unwrap();
        assert_eq!(m.bucket_count(), 11);
    }

    #[test]
    fn iteration_covers_every_key_once() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::with_buckets(31);
        for i in 0..100 {
            m.insert(format!("k{i}"), i);
        }
        for i in (0..100).step_by(3) {
            assert_eq!(m.erase(format!("k{i}").as_str()), 1);
        }
        let it = m.iter();
        assert_eq!(it.len(), m.len());
        let seen: Vec<&String> = m.keys().collect();
        let unique: BTreeSet<&String> = seen.iter().copied().collect();
        assert_eq!(seen.len(), unique.len());
        assert_eq!(seen.len(), m.len());
        for i in 0..100 {
            assert_eq!(m.contains_key(format!("k{i}").as_str()), i % 3 != 0);
        }
    }
}
