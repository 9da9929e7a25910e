//! Bucket-by-bucket text dump for diagnostics.

use crate::chained_hash_map::ChainedHashMap;
use core::fmt;

/// `Display` view returned by [`ChainedHashMap::dump`].
///
/// One line per bucket, in index order: the index, a colon, then every
/// chained entry as `(key, value) ` in chain order.
pub struct Dump<'a, K, V, H, E> {
    map: &'a ChainedHashMap<K, V, H, E>,
}

impl<K, V, H, E> ChainedHashMap<K, V, H, E> {
    pub fn dump(&self) -> Dump<'_, K, V, H, E> {
        Dump { map: self }
    }
}

impl<K: fmt::Display, V: fmt::Display, H, E> fmt::Display for Dump<'_, K, V, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.map.buckets() {
            write!(f, "{index}: ")?;
            for (k, v) in chain {
                write!(f, "({k}, {v}) ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
