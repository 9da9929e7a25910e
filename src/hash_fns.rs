//! Key hashing and key equality strategies.
//!
//! A `ChainedHashMap` is parameterized by a `KeyHash` (key -> `u64`) and a
//! `KeyEq` (key equality). Both must be pure: equal keys must always hash
//! to the same code, otherwise lookups miss. The hash only selects a
//! bucket; entries are matched with `KeyEq`.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Hashing strategy for keys of type `K`.
pub trait KeyHash<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

/// Equality predicate for keys of type `K`.
pub trait KeyEq<K: ?Sized> {
    fn eq_keys(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyHash<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn eq_keys(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Equality through `K: Eq`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEq;

impl<K: ?Sized + Eq> KeyEq<K> for DefaultEq {
    #[inline]
    fn eq_keys(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Feeds any `K: Hash` through a `BuildHasher`. This is the default strategy.
#[derive(Clone, Debug, Default)]
pub struct BuildHash<S = RandomState>(pub S);

impl<K: ?Sized + Hash, S: BuildHasher> KeyHash<K> for BuildHash<S> {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

const POLY_BASE: u64 = 19;
const POLY_MODULUS: u64 = 3_298_534_883_309;

/// Polynomial rolling hash: `sum(byte[i] * B^i)` with `B = 19`.
///
/// The power is kept reduced mod `M = 3298534883309` but the accumulator is
/// not: it wraps at 64 bits. The result is therefore not a residue mod `M`.
/// Keep it that way; existing bucket layouts depend on it.
pub fn polynomial_rolling(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0;
    let mut power: u64 = 1;
    for &b in bytes {
        hash = hash.wrapping_add(u64::from(b).wrapping_mul(power));
        // power < M, so power * 19 stays well below u64::MAX
        power = (power * POLY_BASE) % POLY_MODULUS;
    }
    hash
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// [`polynomial_rolling`] over the key's bytes.
#[derive(Copy, Clone, Debug, Default)]
pub struct PolynomialRollingHash;

impl<K: ?Sized + AsRef<[u8]>> KeyHash<K> for PolynomialRollingHash {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        polynomial_rolling(key.as_ref())
    }
}

/// [`fnv1a`] over the key's bytes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fnv1aHash;

impl<K: ?Sized + AsRef<[u8]>> KeyHash<K> for Fnv1aHash {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        fnv1a(key.as_ref())
    }
}
