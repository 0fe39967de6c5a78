//! # Bounded Least Recently Used (LRU) container
//!
//! [`LruCore`] is the leaf primitive of this crate. [`TwoQCache`] and
//! [`ArcCache`] own several independent instances and express their policies
//! purely in terms of the operations defined here.
//!
//! [`TwoQCache`]: crate::policy::two_q::TwoQCache
//! [`ArcCache`]: crate::policy::arc::ArcCache
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                            LruCore<V>                                │
//!   │                                                                      │
//!   │   index: FxHashMap<Key, NodeId>       list: RecencyList<Node<V>>     │
//!   │   ┌───────┬─────────┐                                                │
//!   │   │  Key  │ NodeId  │        head (MRU)                  tail (LRU)  │
//!   │   ├───────┼─────────┤           │                            │       │
//!   │   │   7   │  id_2   │──────►  [id_2] ◄──► [id_0] ◄──► [id_1]         │
//!   │   │   3   │  id_0   │──────►    k=7        k=3        k=9            │
//!   │   │   9   │  id_1   │──────►  Present    Present    Ghost            │
//!   │   └───────┴─────────┘                                                │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation  | Time | Reorders | Notes                                       |
//! |------------|------|----------|---------------------------------------------|
//! | `get`      | O(1) | yes      | Hit moves the entry to the MRU position     |
//! | `put`      | O(1) | yes      | Update in place, or insert + evict the tail |
//! | `peek`     | O(1) | no       |                                             |
//! | `remove`   | O(1) | -        | Returns whether the key was present         |
//! | `purge`    | O(n) | -        |                                             |
//! | `items`    | O(n) | no       | Cloned snapshot, MRU first                  |
//!
//! ## Example Usage
//!
//! ```
//! use ghostcache::policy::lru::LruCore;
//!
//! let mut cache = LruCore::new(2);
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.get(&1);
//! cache.put(3, "c"); // evicts 2, the least recently used
//!
//! assert_eq!(cache.peek(&2), None);
//! let keys: Vec<u64> = cache.items().iter().map(|item| item.key).collect();
//! assert_eq!(keys, vec![3, 1]);
//! ```
//!
//! ## Thread Safety
//!
//! `LruCore` performs no internal synchronization. Wrap it in a mutex for
//! shared use.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{NodeId, RecencyList};
use crate::entry::{Entry, Item, Key};
use crate::error::{ConfigError, InvariantError, ensure_invariant};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::CoreCache;

#[derive(Debug)]
struct Node<V> {
    key: Key,
    entry: Entry<V>,
}

/// Fixed-capacity map plus recency order.
///
/// Entries are kept most-recently-used first. Inserting a new key into a full
/// container evicts exactly one entry, the current tail.
pub struct LruCore<V> {
    index: FxHashMap<Key, NodeId>,
    list: RecencyList<Node<V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<V> LruCore<V> {
    /// Creates a container holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use ghostcache::policy::lru::LruCore;
    ///
    /// assert!(LruCore::<String>::try_new(16).is_ok());
    /// assert!(LruCore::<String>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::with_capacity_unchecked(capacity))
    }

    /// Creates a container holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Ghost queues may be sized to zero by a ratio; such a queue retains
    /// nothing because every insert immediately evicts itself.
    pub(crate) fn with_capacity_unchecked(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// Ghost entries are refreshed but carry no value, so they yield `None`.
    pub fn get(&mut self, key: &Key) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };
        self.list.move_to_front(id);
        let value = self.list.get(id).and_then(|node| node.entry.value());
        #[cfg(feature = "metrics")]
        {
            if value.is_some() {
                self.metrics.record_get_hit();
            } else {
                self.metrics.record_get_miss();
            }
        }
        value
    }

    /// Inserts or updates `key`.
    ///
    /// An update replaces the value and refreshes recency without a capacity
    /// check. A new key goes to the MRU position and, if that overflows the
    /// container, the LRU entry is dropped.
    pub fn put(&mut self, key: Key, value: V) {
        self.insert_entry(key, Entry::Present(value));
    }

    /// Records `key` as a value-less ghost.
    pub(crate) fn put_ghost(&mut self, key: Key) {
        self.insert_entry(key, Entry::Ghost);
    }

    fn insert_entry(&mut self, key: Key, entry: Entry<V>) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            if let Some(node) = self.list.get_mut(id) {
                node.entry = entry;
            }
            self.list.move_to_front(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        let id = self.list.push_front(Node { key, entry });
        self.index.insert(key, id);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.list.len() > self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();
            if let Some((evicted, _)) = self.pop_oldest() {
                trace!(key = evicted, capacity = self.capacity, "lru evicted tail");
            }
        }
    }

    /// Returns the value for `key` without touching recency.
    pub fn peek(&self, key: &Key) -> Option<&V> {
        let id = self.index.get(key)?;
        self.list.get(*id).and_then(|node| node.entry.value())
    }

    /// Deletes `key`; returns `true` if it was present.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.take(key).is_some()
    }

    /// Deletes `key` and hands back its entry so it can be moved elsewhere.
    pub(crate) fn take(&mut self, key: &Key) -> Option<Entry<V>> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|node| node.entry)
    }

    /// Empties the container.
    pub fn purge(&mut self) {
        self.index.clear();
        self.list.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Snapshot of all live entries, most recent first.
    ///
    /// The returned vector owns clones of the values and does not observe
    /// later mutation of the container.
    pub fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        self.list
            .iter()
            .filter_map(|node| {
                node.entry
                    .value()
                    .map(|value| Item::new(node.key, value.clone()))
            })
            .collect()
    }

    /// Number of entries, ghosts included.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Membership test that does not reorder. Ghost entries count.
    pub fn contains(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Drops the LRU entry, if any.
    pub(crate) fn remove_oldest(&mut self) -> bool {
        self.pop_oldest().is_some()
    }

    /// Removes the LRU entry and returns it.
    pub(crate) fn pop_oldest(&mut self) -> Option<(Key, Entry<V>)> {
        let node = self.list.pop_back()?;
        self.index.remove(&node.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        Some((node.key, node.entry))
    }

    /// Keys from MRU to LRU, ghosts included.
    pub(crate) fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.list.iter().map(|node| node.key)
    }

    /// Returns `true` if every entry is a ghost (vacuously for an empty container).
    pub(crate) fn all_ghosts(&self) -> bool {
        self.list.iter().all(|node| node.entry.is_ghost())
    }

    /// Returns `true` if no entry is a ghost.
    pub(crate) fn no_ghosts(&self) -> bool {
        self.list.iter().all(|node| !node.entry.is_ghost())
    }

    /// Verifies the index/list correspondence and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        ensure_invariant!(
            self.index.len() == self.list.len(),
            "index has {} keys but list has {} nodes",
            self.index.len(),
            self.list.len()
        );
        ensure_invariant!(
            self.list.len() <= self.capacity,
            "length ({}) exceeds capacity ({})",
            self.list.len(),
            self.capacity
        );
        for (&key, &id) in &self.index {
            let node_key = self.list.get(id).map(|node| node.key);
            ensure_invariant!(
                node_key == Some(key),
                "index maps {} to a node holding {:?}",
                key,
                node_key
            );
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        if let Err(e) = self.check_invariants() {
            panic!("{}", e);
        }
    }
}

#[cfg(feature = "metrics")]
impl<V> LruCore<V> {
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            core: self.metrics.core_snapshot(),
            cache_len: self.list.len(),
            capacity: self.capacity,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = LruMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<V> {
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<V> CoreCache<V> for LruCore<V> {
    fn get(&mut self, key: &Key) -> Option<&V> {
        LruCore::get(self, key)
    }

    fn put(&mut self, key: Key, value: V) {
        LruCore::put(self, key, value)
    }

    fn peek(&self, key: &Key) -> Option<&V> {
        LruCore::peek(self, key)
    }

    fn remove(&mut self, key: &Key) -> bool {
        LruCore::remove(self, key)
    }

    fn purge(&mut self) {
        LruCore::purge(self)
    }

    fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        LruCore::items(self)
    }

    fn contains(&self, key: &Key) -> bool {
        self.index.get(key).is_some_and(|&id| {
            self.list
                .get(id)
                .is_some_and(|node| !node.entry.is_ghost())
        })
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V> Extend<(Key, V)> for LruCore<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V> fmt::Debug for LruCore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(cache: &LruCore<V>) -> Vec<Key> {
        cache.keys().collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            LruCore::<i32>::try_new(0).unwrap_err(),
            ConfigError::ZeroCapacity
        );
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn new_panics_on_zero_capacity() {
        let _ = LruCore::<i32>::new(0);
    }

    #[test]
    fn put_then_get() {
        let mut cache = LruCore::new(4);
        cache.put(1, "one");
        assert_eq!(cache.get(&1), Some(&"one"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_follows_recency() {
        let mut cache = LruCore::new(2);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1);
        cache.put(3, "c");

        assert!(!cache.contains(&2));
        let items = cache.items();
        assert_eq!(items, vec![Item::new(3, "c"), Item::new(1, "a")]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn scenario_capacity_two() {
        let mut cache = LruCore::new(2);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn update_refreshes_without_growing() {
        let mut cache = LruCore::new(2);
        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(1, 11);
        assert_eq!(cache.len(), 2);
        assert_eq!(keys(&cache), vec![1, 2]);

        cache.put(3, 30);
        assert_eq!(cache.peek(&1), Some(&11));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn peek_does_not_reorder() {
        let mut cache = LruCore::new(2);
        cache.put(1, 10);
        cache.put(2, 20);
        assert_eq!(cache.peek(&1), Some(&10));
        cache.put(3, 30);
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cache = LruCore::new(3);
        cache.put(1, 10);
        cache.put(2, 20);
        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert_eq!(cache.len(), 1);
        assert_eq!(keys(&cache), vec![2]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn purge_empties() {
        let mut cache = LruCore::new(3);
        cache.extend([(1, 10), (2, 20)]);
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert!(cache.items().is_empty());
    }

    #[test]
    fn items_snapshot_is_independent() {
        let mut cache = LruCore::new(3);
        cache.put(1, String::from("a"));
        let snapshot = cache.items();
        cache.put(1, String::from("changed"));
        cache.remove(&1);
        assert_eq!(snapshot, vec![Item::new(1, String::from("a"))]);
    }

    #[test]
    fn pop_oldest_returns_tail_payload() {
        let mut cache = LruCore::new(3);
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.pop_oldest(), Some((1, Entry::Present("a"))));
        assert_eq!(cache.pop_oldest(), Some((2, Entry::Present("b"))));
        assert_eq!(cache.pop_oldest(), None);
        assert!(!cache.remove_oldest());
    }

    #[test]
    fn ghost_entries_have_membership_but_no_value() {
        let mut cache: LruCore<i32> = LruCore::new(2);
        cache.put_ghost(7);
        assert!(cache.contains(&7));
        assert!(!CoreCache::contains(&cache, &7));
        assert_eq!(cache.peek(&7), None);
        assert_eq!(cache.get(&7), None);
        assert!(cache.items().is_empty());
        assert_eq!(cache.len(), 1);
        assert!(cache.all_ghosts());
    }

    #[test]
    fn zero_capacity_ghost_queue_retains_nothing() {
        let mut ghosts: LruCore<()> = LruCore::with_capacity_unchecked(0);
        ghosts.put_ghost(1);
        ghosts.put_ghost(2);
        assert!(ghosts.is_empty());
        assert!(!ghosts.contains(&1));
        ghosts.debug_validate_invariants();
    }

    #[test]
    fn take_moves_value_out() {
        let mut cache = LruCore::new(2);
        cache.put(1, vec![1, 2, 3]);
        assert_eq!(cache.take(&1), Some(Entry::Present(vec![1, 2, 3])));
        assert_eq!(cache.take(&1), None);
    }

    #[test]
    fn capacity_never_exceeded_under_churn() {
        let mut cache = LruCore::new(8);
        for i in 0..200u64 {
            cache.put(i % 23, i);
            if i % 3 == 0 {
                cache.get(&(i % 7));
            }
            assert!(cache.len() <= 8);
        }
        cache.debug_validate_invariants();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_count_hits_misses_and_evictions() {
        let mut cache = LruCore::new(1);
        cache.put(1, 1);
        cache.get(&1);
        cache.get(&2);
        cache.put(2, 2);
        let snap = cache.metrics_snapshot();
        assert_eq!(snap.core.get_hits, 1);
        assert_eq!(snap.core.get_misses, 1);
        assert_eq!(snap.core.insert_new, 2);
        assert_eq!(snap.core.evicted_entries, 1);
        assert_eq!(snap.cache_len, 1);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_count_ghost_lookup_as_miss() {
        let mut cache: LruCore<i32> = LruCore::new(2);
        cache.put_ghost(7);
        assert_eq!(cache.get(&7), None);
        cache.put(8, 8);
        assert_eq!(cache.get(&8), Some(&8));

        let snap = cache.metrics_snapshot();
        assert_eq!(snap.core.get_calls, 2);
        assert_eq!(snap.core.get_hits, 1);
        assert_eq!(snap.core.get_misses, 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// len() never exceeds capacity and index/list stay in sync.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_within_capacity(
            capacity in 1usize..32,
            ops in prop::collection::vec((0u8..4, 0u64..64, any::<u32>()), 0..300)
        ) {
            let mut cache = LruCore::new(capacity);
            for (op, key, value) in ops {
                match op {
                    0 | 1 => cache.put(key, value),
                    2 => { cache.get(&key); },
                    _ => { cache.remove(&key); },
                }
                prop_assert!(cache.len() <= capacity);
                prop_assert!(cache.check_invariants().is_ok());
            }
        }

        /// An update never changes the length.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_update_does_not_grow(
            keys in prop::collection::vec(0u64..16, 1..40),
            value in any::<u32>()
        ) {
            let mut cache = LruCore::new(16);
            for &key in &keys {
                cache.put(key, 0u32);
            }
            for &key in &keys {
                let before = cache.len();
                cache.put(key, value);
                prop_assert_eq!(cache.len(), before);
            }
        }
    }
}
