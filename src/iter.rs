//! Cursors and iterators over a `ChainedHashMap`.
//!
//! Global traversal runs bucket by bucket in ascending index order and,
//! inside a bucket, head to tail (newest entry first). It is not insertion
//! order.

use crate::chained_hash_map::{ChainedHashMap, Node};
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SlotMap};

/// Position of one entry in a map, or the end sentinel.
///
/// A cursor is a plain value and does not borrow the map. It is resolved
/// against a map on each access. Once its entry is erased the cursor goes
/// stale and resolves to `None`, even if the slot is later reused. A cursor
/// must only be used with the map that produced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor(pub(crate) Option<DefaultKey>);

impl Cursor {
    /// The end sentinel, one past the last entry.
    pub const END: Cursor = Cursor(None);

    pub(crate) fn at(k: DefaultKey) -> Self {
        Cursor(Some(k))
    }

    pub(crate) fn raw(&self) -> Option<DefaultKey> {
        self.0
    }

    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }

    pub fn key<'a, K, V, H, E>(&self, map: &'a ChainedHashMap<K, V, H, E>) -> Option<&'a K> {
        map.node_at(*self).map(|n| &n.key)
    }

    pub fn value<'a, K, V, H, E>(&self, map: &'a ChainedHashMap<K, V, H, E>) -> Option<&'a V> {
        map.node_at(*self).map(|n| &n.value)
    }

    pub fn entry<'a, K, V, H, E>(
        &self,
        map: &'a ChainedHashMap<K, V, H, E>,
    ) -> Option<(&'a K, &'a V)> {
        map.node_at(*self).map(|n| (&n.key, &n.value))
    }

    /// Only the value is mutable; keys are fixed once stored.
    pub fn value_mut<'a, K, V, H, E>(
        &self,
        map: &'a mut ChainedHashMap<K, V, H, E>,
    ) -> Option<&'a mut V> {
        map.node_at_mut(*self).map(|n| &mut n.value)
    }
}

/// Iterator over every entry, in bucket order.
pub struct Iter<'a, K, V, H, E> {
    pub(crate) map: &'a ChainedHashMap<K, V, H, E>,
    pub(crate) cursor: Cursor,
    pub(crate) remaining: usize,
}

impl<'a, K, V, H, E> Iterator for Iter<'a, K, V, H, E> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.map.node_at(self.cursor)?;
        self.cursor = self.map.advance(self.cursor);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, H, E> ExactSizeIterator for Iter<'_, K, V, H, E> {}
impl<K, V, H, E> FusedIterator for Iter<'_, K, V, H, E> {}

impl<K, V, H, E> Clone for Iter<'_, K, V, H, E> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

/// Keys in bucket order.
pub struct Keys<'a, K, V, H, E> {
    pub(crate) inner: Iter<'a, K, V, H, E>,
}

impl<'a, K, V, H, E> Iterator for Keys<'a, K, V, H, E> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H, E> ExactSizeIterator for Keys<'_, K, V, H, E> {}
impl<K, V, H, E> FusedIterator for Keys<'_, K, V, H, E> {}

/// Values in bucket order.
pub struct Values<'a, K, V, H, E> {
    pub(crate) inner: Iter<'a, K, V, H, E>,
}

impl<'a, K, V, H, E> Iterator for Values<'a, K, V, H, E> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, H, E> ExactSizeIterator for Values<'_, K, V, H, E> {}
impl<K, V, H, E> FusedIterator for Values<'_, K, V, H, E> {}

/// Iterator over a single bucket's chain. Stops at the end of that chain.
pub struct BucketIter<'a, K, V> {
    pub(crate) nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    pub(crate) next: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.next;
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for BucketIter<'_, K, V> {}

/// Every bucket index paired with its chain, empty buckets included.
pub struct Buckets<'a, K, V> {
    pub(crate) nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    pub(crate) slots: core::iter::Enumerate<core::slice::Iter<'a, Option<DefaultKey>>>,
}

impl<'a, K, V> Iterator for Buckets<'a, K, V> {
    type Item = (usize, BucketIter<'a, K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (index, &head) = self.slots.next()?;
        Some((
            index,
            BucketIter {
                nodes: self.nodes,
                next: head,
            },
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Buckets<'_, K, V> {}
