//! Two-Queue (2Q) cache replacement policy.
//!
//! Separates keys seen once from keys seen at least twice, and remembers
//! recently churned-out keys so that a returning key can skip the probation
//! queue. Scan traffic stays in `recent` and cannot flush `frequent`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           TwoQCache<V> Layout                           │
//! │                                                                         │
//! │   recent: LruCore<V>        frequent: LruCore<V>      ghost: LruCore<V> │
//! │   (seen once, A1in)         (seen twice+, Am)         (keys only, A1out)│
//! │   ┌──────────────────┐      ┌──────────────────┐      ┌───────────────┐ │
//! │   │ MRU          LRU │      │ MRU          LRU │      │ MRU       LRU │ │
//! │   │ [k9] ◄─► [k4] ─┐ │      │ [k1] ◄─► [k7]    │      │ [k4'] ◄─► ... │ │
//! │   └────────────────┼─┘      └──────────────────┘      └───────────────┘ │
//! │                    │  evicted when over recent_size          ▲          │
//! │                    └─────────── key only ───────────────────┘          │
//! │                                                                         │
//! │   len(recent) + len(frequent) <= size                                   │
//! │   recent_size = size * recent_ratio   ghost capacity = size * ghost_ratio│
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! put(key, value)
//! ───────────────
//!   key in frequent  → overwrite in place (refreshes recency)
//!   key in recent    → move to frequent with the new value
//!   key in ghost     → ensure_space(true), drop ghost, insert into frequent
//!   otherwise        → ensure_space(false), insert into recent
//!
//! ensure_space(recent_evict)
//! ──────────────────────────
//!   if len(recent) + len(frequent) < size: nothing to do
//!   if recent non-empty and (len(recent) > recent_size
//!        or (len(recent) == recent_size and !recent_evict)):
//!       recent LRU → ghost (key only)
//!   else:
//!       drop frequent LRU (not remembered)
//! ```
//!
//! The `recent_evict` flag breaks the tie at `len(recent) == recent_size`: a
//! key re-admitted from the ghost queue has already proven it is not a
//! one-off, so the boundary eviction falls on `frequent` instead.
//!
//! ## Example Usage
//!
//! ```
//! use ghostcache::policy::two_q::{TwoQCache, TwoQQueue};
//!
//! let mut cache = TwoQCache::new(100);
//!
//! cache.put(1, "page1");
//! assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Recent));
//!
//! // A second access promotes to the frequent queue.
//! assert_eq!(cache.get(&1), Some(&"page1"));
//! assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. Wrap in external synchronization for concurrent access.
//!
//! ## References
//!
//! - Johnson & Shasha, "2Q: A Low Overhead High Performance Buffer Management
//!   Replacement Algorithm", VLDB 1994

use std::fmt;

use tracing::trace;

use crate::entry::{Entry, Item, Key};
use crate::error::{ConfigError, InvariantError, ensure_invariant};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TwoQMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TwoQMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider, TwoQMetricsRecorder};
use crate::policy::lru::LruCore;
use crate::traits::CoreCache;

/// Share of `size` reserved for keys that have been seen only once.
pub const DEFAULT_RECENT_RATIO: f64 = 0.25;

/// Ghost queue capacity as a share of `size`.
pub const DEFAULT_GHOST_RATIO: f64 = 0.50;

/// Which internal queue currently holds a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TwoQQueue {
    /// Seen once.
    Recent,
    /// Seen at least twice, or re-admitted from the ghost queue.
    Frequent,
    /// Recently evicted from `Recent`; key only.
    Ghost,
}

/// Two-Queue cache built from three bounded LRU containers.
pub struct TwoQCache<V> {
    recent: LruCore<V>,
    frequent: LruCore<V>,
    ghost: LruCore<V>,
    size: usize,
    recent_size: usize,
    #[cfg(feature = "metrics")]
    metrics: TwoQMetrics,
}

impl<V> TwoQCache<V> {
    /// Creates a 2Q cache with the default ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `size` is zero.
    pub fn try_new(size: usize) -> Result<Self, ConfigError> {
        Self::try_with_ratios(size, DEFAULT_RECENT_RATIO, DEFAULT_GHOST_RATIO)
    }

    /// Creates a 2Q cache with the default ratios.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero. See [`try_new`](Self::try_new).
    pub fn new(size: usize) -> Self {
        match Self::try_new(size) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a 2Q cache with custom ratios.
    ///
    /// Derived sizes truncate toward zero. A ghost capacity of zero disables
    /// ghost tracking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `size` is zero or either ratio is not a
    /// finite value in `[0.0, 1.0]`.
    ///
    /// # Example
    ///
    /// ```
    /// use ghostcache::policy::two_q::TwoQCache;
    ///
    /// let cache = TwoQCache::<u32>::try_with_ratios(100, 0.1, 0.5).unwrap();
    /// assert_eq!(cache.recent_capacity(), 10);
    /// assert_eq!(cache.ghost_capacity(), 50);
    /// ```
    pub fn try_with_ratios(
        size: usize,
        recent_ratio: f64,
        ghost_ratio: f64,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let recent_ratio = ConfigError::check_ratio("recent_ratio", recent_ratio)?;
        let ghost_ratio = ConfigError::check_ratio("ghost_ratio", ghost_ratio)?;

        let recent_size = (size as f64 * recent_ratio) as usize;
        let ghost_size = (size as f64 * ghost_ratio) as usize;

        Ok(Self {
            recent: LruCore::try_new(size)?,
            frequent: LruCore::try_new(size)?,
            ghost: LruCore::with_capacity_unchecked(ghost_size),
            size,
            recent_size,
            #[cfg(feature = "metrics")]
            metrics: TwoQMetrics::default(),
        })
    }

    /// Creates a 2Q cache with custom ratios.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters. See [`try_with_ratios`](Self::try_with_ratios).
    pub fn with_ratios(size: usize, recent_ratio: f64, ghost_ratio: f64) -> Self {
        match Self::try_with_ratios(size, recent_ratio, ghost_ratio) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Returns the value for `key`.
    ///
    /// A hit in `frequent` refreshes its recency. A hit in `recent` is the
    /// key's second access and moves it to `frequent`.
    pub fn get(&mut self, key: &Key) -> Option<&V> {
        if self.frequent.contains(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
            return self.frequent.get(key);
        }

        if let Some(Entry::Present(value)) = self.recent.take(key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_get_hit();
                self.metrics.record_recent_to_frequent_promotion();
            }
            self.frequent.put(*key, value);
            return self.frequent.peek(key);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_get_miss();
        None
    }

    /// Inserts or updates `key`.
    pub fn put(&mut self, key: Key, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.frequent.contains(&key) {
            self.frequent.put(key, value);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        if self.recent.remove(&key) {
            self.frequent.put(key, value);
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_insert_update();
                self.metrics.record_recent_to_frequent_promotion();
            }
            return;
        }

        if self.ghost.contains(&key) {
            trace!(key, "2q ghost hit, admitting to frequent");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_ghost_hit();
                self.metrics.record_insert_new();
            }
            self.ensure_space(true);
            self.ghost.remove(&key);
            self.frequent.put(key, value);
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        self.ensure_space(false);
        self.recent.put(key, value);
    }

    /// Frees one slot if the live queues are full.
    fn ensure_space(&mut self, recent_evict: bool) {
        let recent_len = self.recent.len();
        if recent_len + self.frequent.len() < self.size {
            return;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let evict_recent = recent_len > 0
            && (recent_len > self.recent_size
                || (recent_len == self.recent_size && !recent_evict));

        // An empty frequent queue cannot give up a slot.
        if evict_recent || self.frequent.is_empty() {
            if let Some((key, _)) = self.recent.pop_oldest() {
                trace!(key, recent_len, "2q evicted recent entry to ghost");
                self.ghost.put_ghost(key);
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_evicted_entry();
                    self.metrics.record_recent_eviction();
                }
            }
            return;
        }

        if let Some((key, _)) = self.frequent.pop_oldest() {
            trace!(key, "2q evicted frequent entry");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_evicted_entry();
                self.metrics.record_frequent_eviction();
            }
        }
    }

    /// Returns the value for `key` without promotion or reordering.
    pub fn peek(&self, key: &Key) -> Option<&V> {
        self.frequent.peek(key).or_else(|| self.recent.peek(key))
    }

    /// Deletes `key` from the first queue that holds it, ghost included.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.frequent.remove(key) || self.recent.remove(key) || self.ghost.remove(key)
    }

    /// Clears all three queues.
    pub fn purge(&mut self) {
        self.recent.purge();
        self.frequent.purge();
        self.ghost.purge();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Snapshot of `recent` followed by `frequent`, each MRU first.
    pub fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        let mut items = Vec::with_capacity(self.len());
        items.extend(self.recent.items());
        items.extend(self.frequent.items());
        items
    }

    /// Live entries; ghosts are not counted.
    pub fn len(&self) -> usize {
        self.recent.len() + self.frequent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    pub fn frequent_len(&self) -> usize {
        self.frequent.len()
    }

    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    /// Target size of the recent queue (`size * recent_ratio`).
    pub fn recent_capacity(&self) -> usize {
        self.recent_size
    }

    pub fn ghost_capacity(&self) -> usize {
        self.ghost.capacity()
    }

    /// Reports which queue holds `key`, without reordering.
    pub fn queue_of(&self, key: &Key) -> Option<TwoQQueue> {
        if self.frequent.contains(key) {
            Some(TwoQQueue::Frequent)
        } else if self.recent.contains(key) {
            Some(TwoQQueue::Recent)
        } else if self.ghost.contains(key) {
            Some(TwoQQueue::Ghost)
        } else {
            None
        }
    }

    /// Validates internal invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] naming the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.recent.check_invariants()?;
        self.frequent.check_invariants()?;
        self.ghost.check_invariants()?;

        ensure_invariant!(
            self.len() <= self.size,
            "recent ({}) + frequent ({}) exceeds size ({})",
            self.recent.len(),
            self.frequent.len(),
            self.size
        );
        ensure_invariant!(self.recent.no_ghosts(), "recent queue holds a ghost entry");
        ensure_invariant!(self.frequent.no_ghosts(), "frequent queue holds a ghost entry");
        ensure_invariant!(self.ghost.all_ghosts(), "ghost queue holds a value");

        for key in self.recent.keys() {
            ensure_invariant!(
                !self.frequent.contains(&key) && !self.ghost.contains(&key),
                "key {} is in recent and another queue",
                key
            );
        }
        for key in self.frequent.keys() {
            ensure_invariant!(
                !self.ghost.contains(&key),
                "key {} is in both frequent and ghost",
                key
            );
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(e) = self.check_invariants() {
            panic!("{}", e);
        }
    }
}

#[cfg(feature = "metrics")]
impl<V> TwoQCache<V> {
    pub fn metrics_snapshot(&self) -> TwoQMetricsSnapshot {
        TwoQMetricsSnapshot {
            core: self.metrics.core.core_snapshot(),
            recent_to_frequent_promotions: self.metrics.recent_to_frequent_promotions,
            ghost_hits: self.metrics.ghost_hits,
            recent_evictions: self.metrics.recent_evictions,
            frequent_evictions: self.metrics.frequent_evictions,
            cache_len: self.len(),
            ghost_len: self.ghost.len(),
            capacity: self.size,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = TwoQMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsSnapshotProvider<TwoQMetricsSnapshot> for TwoQCache<V> {
    fn snapshot(&self) -> TwoQMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<V> CoreCache<V> for TwoQCache<V> {
    fn get(&mut self, key: &Key) -> Option<&V> {
        TwoQCache::get(self, key)
    }

    fn put(&mut self, key: Key, value: V) {
        TwoQCache::put(self, key, value)
    }

    fn peek(&self, key: &Key) -> Option<&V> {
        TwoQCache::peek(self, key)
    }

    fn remove(&mut self, key: &Key) -> bool {
        TwoQCache::remove(self, key)
    }

    fn purge(&mut self) {
        TwoQCache::purge(self)
    }

    fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        TwoQCache::items(self)
    }

    fn contains(&self, key: &Key) -> bool {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    fn len(&self) -> usize {
        TwoQCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.size
    }
}

impl<V> fmt::Debug for TwoQCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoQCache")
            .field("size", &self.size)
            .field("recent_size", &self.recent_size)
            .field("recent_len", &self.recent.len())
            .field("frequent_len", &self.frequent.len())
            .field("ghost_len", &self.ghost.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_parameters() {
        assert_eq!(
            TwoQCache::<i32>::try_new(0).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert!(matches!(
            TwoQCache::<i32>::try_with_ratios(10, -0.1, 0.5),
            Err(ConfigError::RatioOutOfRange {
                name: "recent_ratio",
                ..
            })
        ));
        assert!(matches!(
            TwoQCache::<i32>::try_with_ratios(10, 0.5, 1.1),
            Err(ConfigError::RatioOutOfRange {
                name: "ghost_ratio",
                ..
            })
        ));
        assert!(TwoQCache::<i32>::try_with_ratios(10, 0.0, 1.0).is_ok());
    }

    #[test]
    fn default_ratios_derive_queue_sizes() {
        let cache: TwoQCache<i32> = TwoQCache::new(4);
        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.recent_capacity(), 1);
        assert_eq!(cache.ghost_capacity(), 2);
    }

    #[test]
    fn tiny_size_disables_ghost_tracking() {
        let mut cache = TwoQCache::new(1);
        assert_eq!(cache.ghost_capacity(), 0);
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.queue_of(&1), None);
        cache.debug_validate_invariants();
    }

    #[test]
    fn first_put_lands_in_recent_second_access_promotes() {
        let mut cache = TwoQCache::new(10);
        cache.put(1, "a");
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Recent));

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));

        cache.put(1, "b");
        assert_eq!(cache.get(&1), Some(&"b"));
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
        assert_eq!(cache.recent_len(), 0);
        assert_eq!(cache.frequent_len(), 1);
    }

    #[test]
    fn put_on_recent_key_promotes_with_new_value() {
        let mut cache = TwoQCache::new(10);
        cache.put(1, "a");
        cache.put(1, "b");
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
        assert_eq!(cache.peek(&1), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn peek_does_not_promote() {
        let mut cache = TwoQCache::new(10);
        cache.put(1, "a");
        assert_eq!(cache.peek(&1), Some(&"a"));
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Recent));
    }

    #[test]
    fn scenario_ghost_readmission_bypasses_recent() {
        let mut cache = TwoQCache::new(4);
        for key in 1..=4 {
            cache.put(key, key * 10);
        }
        assert_eq!(cache.recent_len(), 4);
        assert_eq!(cache.ghost_len(), 0);

        cache.put(5, 50);
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Ghost));
        assert_eq!(cache.ghost_len(), 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.peek(&1), None);

        cache.put(1, 11);
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
        assert_eq!(cache.get(&1), Some(&11));
        // making room pushed the next-oldest recent key into the ghost queue
        assert_eq!(cache.queue_of(&2), Some(TwoQQueue::Ghost));
        assert_eq!(cache.len(), 4);
        cache.debug_validate_invariants();
    }

    #[test]
    fn boundary_tie_break_depends_on_admission_path() {
        let mut cache = TwoQCache::new(4);
        for key in 1..=3 {
            cache.put(key, key);
            cache.get(&key);
        }
        cache.put(4, 4);
        assert_eq!(cache.recent_len(), 1);
        assert_eq!(cache.frequent_len(), 3);

        // brand-new key at len(recent) == recent_size evicts from recent
        cache.put(5, 5);
        assert_eq!(cache.queue_of(&4), Some(TwoQQueue::Ghost));
        assert_eq!(cache.queue_of(&5), Some(TwoQQueue::Recent));

        // ghost re-admission at the same boundary evicts from frequent
        cache.put(4, 40);
        assert_eq!(cache.queue_of(&4), Some(TwoQQueue::Frequent));
        assert_eq!(cache.queue_of(&1), None);
        assert_eq!(cache.queue_of(&5), Some(TwoQQueue::Recent));
        assert_eq!(cache.ghost_len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn frequent_evictions_are_not_remembered() {
        let mut cache = TwoQCache::with_ratios(2, 0.0, 1.0);
        cache.put(1, 1);
        cache.get(&1);
        cache.put(2, 2);
        cache.get(&2);
        assert_eq!(cache.frequent_len(), 2);

        cache.put(3, 3);
        assert_eq!(cache.queue_of(&1), None);
        assert_eq!(cache.ghost_len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn full_recent_ratio_never_exceeds_size() {
        let mut cache = TwoQCache::with_ratios(2, 1.0, 0.5);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Ghost));

        cache.put(1, 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_checks_every_queue_and_is_idempotent() {
        let mut cache = TwoQCache::new(4);
        for key in 1..=5 {
            cache.put(key, key);
        }
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Ghost));
        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert_eq!(cache.queue_of(&1), None);

        cache.get(&2);
        assert!(cache.remove(&2));
        assert!(cache.remove(&3));
        assert!(!cache.remove(&3));
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn purge_clears_ghosts_too() {
        let mut cache = TwoQCache::new(4);
        for key in 1..=6 {
            cache.put(key, key);
        }
        cache.get(&6);
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.get(&6), None);

        cache.put(1, 1);
        assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Recent));
    }

    #[test]
    fn items_lists_recent_then_frequent() {
        let mut cache = TwoQCache::new(10);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.get(&1);

        let keys: Vec<Key> = cache.items().iter().map(|item| item.key).collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_promotions_and_ghost_hits() {
        let mut cache = TwoQCache::new(4);
        for key in 1..=5 {
            cache.put(key, key);
        }
        cache.put(1, 1);
        cache.get(&5);
        let snap = cache.metrics_snapshot();
        assert_eq!(snap.ghost_hits, 1);
        assert_eq!(snap.recent_to_frequent_promotions, 1);
        assert_eq!(snap.recent_evictions, 2);
        assert_eq!(snap.cache_len, cache.len());
    }
}
