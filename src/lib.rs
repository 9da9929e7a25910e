//! chained-hashmap: a single-threaded associative container built on
//! separate chaining over a fixed, prime-sized bucket array.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose bucket layout is fully observable (bucket
//!   index, bucket size, per-bucket chains, a text dump) with pluggable
//!   key hashing and key equality.
//! - Layers:
//!   - `primes`: sizes the bucket array to the smallest prime >= the
//!     requested count. Used once, at construction.
//!   - `hash_fns`: `KeyHash`/`KeyEq` contracts plus two string hashes
//!     (polynomial rolling, FNV-1a) and a `BuildHasher` adapter.
//!   - `ChainedHashMap<K, V, H, E>`: bucket array of chain heads over a
//!     generational node arena; insert/find/erase and traversal.
//!   - `iter`: `Cursor` positions and iterators (global and per bucket).
//!
//! Constraints
//! - Single-threaded; callers synchronize externally.
//! - No rehashing: the bucket count never changes after construction, so
//!   chain length is governed by the initial sizing.
//! - Unique keys. Inserting an existing key keeps the stored entry and
//!   reports `inserted == false`.
//! - Chains are LIFO: a new entry becomes its bucket's head.
//!
//! Nodes and cursors
//! - Chain nodes live in a `SlotMap` and link to each other by
//!   generational key. The bucket array holds `Option` of the head key.
//! - A `Cursor` is a node key (or the end sentinel). After its node is
//!   erased a cursor resolves to `None` instead of dangling, and a reused
//!   slot never aliases it.
//! - Each node stores its key's hash from insertion, so traversal never
//!   calls the hasher.
//!
//! Traversal order
//! - `begin()` is the "first" node. On insert the new node becomes first
//!   when its bucket index is <= the current first node's bucket. On erase
//!   of the first node it moves to the node traversal would visit next.
//!   Since new nodes always become bucket heads, first stays the head of
//!   the lowest occupied bucket.
//! - `advance` moves down the chain, then to the head of the next
//!   non-empty bucket, then to `END`. The result is ascending bucket order,
//!   newest-first inside a bucket; not insertion order.
//!
//! Copy and move
//! - `Clone` re-inserts every entry, bucket by bucket, so the copy's chains
//!   come out reversed.
//! - `take()` moves the contents out and leaves an empty table with the
//!   same bucket count behind.

mod chained_hash_map;
mod chained_hash_map_proptest;
mod dump;
mod error;
pub mod hash_fns;
pub mod iter;
pub mod primes;

// Public surface
pub use chained_hash_map::ChainedHashMap;
pub use dump::Dump;
pub use error::TableError;
pub use hash_fns::{BuildHash, DefaultEq, Fnv1aHash, KeyEq, KeyHash, PolynomialRollingHash};
pub use iter::Cursor;
pub use primes::next_prime;
