//! # Adaptive Replacement Cache (ARC)
//!
//! Balances cache space between recency (T1) and frequency (T2) with no
//! fixed ratio. Two ghost lists remember what each side recently evicted;
//! a hit on a ghost is evidence that side was too small, and nudges the
//! target split `p` toward it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            ArcCache<V> Layout                           │
//! │                                                                         │
//! │     B1 (ghost of T1)     T1 (seen once)  │  T2 (seen twice+)   B2 (ghost)│
//! │   ┌────────────────┐  ┌──────────────────┼──────────────────┐ ┌────────┐│
//! │   │ keys only  LRU │◄─┤ LRU          MRU │ MRU          LRU ├►│keys    ││
//! │   └────────────────┘  └──────────────────┼──────────────────┘ └────────┘│
//! │                       ◄──── p ──────────►│                               │
//! │                                                                         │
//! │   len(T1) + len(T2) <= size        0 <= p <= size                       │
//! │   every key lives in at most one of T1, T2, B1, B2                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Key location | `get`                 | `put`                                       |
//! |--------------|-----------------------|---------------------------------------------|
//! | T1           | promote to T2, hit    | promote to T2 with the new value            |
//! | T2           | refresh in T2, hit    | overwrite in place                          |
//! | B1           | miss                  | grow `p`, make room, admit to T2            |
//! | B2           | miss                  | shrink `p`, make room, admit to T2          |
//! | nowhere      | miss                  | make room, trim ghosts, admit to T1         |
//!
//! Ghost adjustments use `delta = max(1, len(other ghost) / len(this ghost))`
//! with integer division, and `p` saturates at `0` and `size`.
//!
//! ## Replacement
//!
//! ```text
//! replace(b2_hit):
//!   if len(T1) > 0 and (len(T1) > p or (len(T1) == p and b2_hit)):
//!       T1 LRU → B1
//!   else:
//!       T2 LRU → B2
//! ```
//!
//! If the selected list is empty the other one gives up its LRU entry, so
//! every call frees exactly one slot.
//!
//! ## Example Usage
//!
//! ```
//! use ghostcache::policy::arc::{ArcCache, ArcList};
//!
//! let mut cache = ArcCache::new(2);
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.put(3, "c"); // 1 is evicted and remembered in B1
//! assert_eq!(cache.list_of(&1), Some(ArcList::B1));
//!
//! cache.put(1, "a"); // ghost hit: T1 deserved more room
//! assert_eq!(cache.p_value(), 1);
//! assert_eq!(cache.list_of(&1), Some(ArcList::T2));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. Wrap in external synchronization for concurrent access.
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::fmt;

use tracing::trace;

use crate::entry::{Entry, Item, Key};
use crate::error::{ConfigError, InvariantError, ensure_invariant};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ArcMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ArcMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{ArcMetricsRecorder, CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::lru::LruCore;
use crate::traits::CoreCache;

/// Which internal list currently holds a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArcList {
    /// Resident, seen once.
    T1,
    /// Resident, seen at least twice.
    T2,
    /// Ghost of a T1 eviction.
    B1,
    /// Ghost of a T2 eviction.
    B2,
}

/// Adaptive Replacement Cache over four bounded LRU containers.
pub struct ArcCache<V> {
    t1: LruCore<V>,
    t2: LruCore<V>,
    b1: LruCore<V>,
    b2: LruCore<V>,
    /// Target size of T1.
    p: usize,
    size: usize,
    #[cfg(feature = "metrics")]
    metrics: ArcMetrics,
}

impl<V> ArcCache<V> {
    /// Creates an ARC cache holding at most `size` live entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `size` is zero.
    pub fn try_new(size: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            t1: LruCore::try_new(size)?,
            t2: LruCore::try_new(size)?,
            b1: LruCore::try_new(size)?,
            b2: LruCore::try_new(size)?,
            p: 0,
            size,
            #[cfg(feature = "metrics")]
            metrics: ArcMetrics::default(),
        })
    }

    /// Creates an ARC cache holding at most `size` live entries.
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

    /// Returns the value for `key`; a T1 hit is promoted to T2.
    pub fn get(&mut self, key: &Key) -> Option<&V> {
        if let Some(Entry::Present(value)) = self.t1.take(key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_get_hit();
                self.metrics.record_t1_to_t2_promotion();
            }
            self.t2.put(*key, value);
            return self.t2.peek(key);
        }

        if self.t2.contains(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
            return self.t2.get(key);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_get_miss();
        None
    }

    /// Inserts or updates `key`, adapting `p` on a ghost hit.
    pub fn put(&mut self, key: Key, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.t1.remove(&key) {
            self.t2.put(key, value);
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_insert_update();
                self.metrics.record_t1_to_t2_promotion();
            }
            return;
        }

        if self.t2.contains(&key) {
            self.t2.put(key, value);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        if self.b1.contains(&key) {
            let delta = (self.b2.len() / self.b1.len()).max(1);
            let old_p = self.p;
            self.p = self.p.saturating_add(delta).min(self.size);
            trace!(key, old_p, delta, p = self.p, "arc b1 ghost hit");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_b1_ghost_hit();
                self.metrics.record_insert_new();
                if self.p != old_p {
                    self.metrics.record_p_increase();
                }
            }

            if self.len() >= self.size {
                self.replace(false);
            }
            self.b1.remove(&key);
            self.t2.put(key, value);
            return;
        }

        if self.b2.contains(&key) {
            let delta = (self.b1.len() / self.b2.len()).max(1);
            let old_p = self.p;
            self.p = self.p.saturating_sub(delta);
            trace!(key, old_p, delta, p = self.p, "arc b2 ghost hit");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_b2_ghost_hit();
                self.metrics.record_insert_new();
                if self.p != old_p {
                    self.metrics.record_p_decrease();
                }
            }

            if self.len() >= self.size {
                self.replace(true);
            }
            self.b2.remove(&key);
            self.t2.put(key, value);
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.len() >= self.size {
            self.replace(false);
        }

        // ghost lists are trimmed lazily, only on fresh admissions
        if self.b1.len() > self.size - self.p {
            self.b1.remove_oldest();
        }
        if self.b2.len() > self.p {
            self.b2.remove_oldest();
        }

        self.t1.put(key, value);
    }

    /// Evicts one resident entry into its ghost list.
    fn replace(&mut self, b2_hit: bool) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let t1_len = self.t1.len();
        let from_t1 = t1_len > 0 && (t1_len > self.p || (t1_len == self.p && b2_hit));

        if from_t1 || self.t2.is_empty() {
            if let Some((key, _)) = self.t1.pop_oldest() {
                trace!(key, t1_len, p = self.p, "arc evicted t1 entry to b1");
                self.b1.put_ghost(key);
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_evicted_entry();
                    self.metrics.record_t1_eviction();
                }
            }
            return;
        }

        if let Some((key, _)) = self.t2.pop_oldest() {
            trace!(key, t1_len, p = self.p, "arc evicted t2 entry to b2");
            self.b2.put_ghost(key);
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_evicted_entry();
                self.metrics.record_t2_eviction();
            }
        }
    }

    /// Returns the value for `key` without promotion or reordering.
    pub fn peek(&self, key: &Key) -> Option<&V> {
        self.t1.peek(key).or_else(|| self.t2.peek(key))
    }

    /// Deletes `key` from the first list that holds it, ghosts included.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.t1.remove(key) || self.t2.remove(key) || self.b1.remove(key) || self.b2.remove(key)
    }

    /// Clears all four lists. The learned `p` is kept.
    pub fn purge(&mut self) {
        self.t1.purge();
        self.t2.purge();
        self.b1.purge();
        self.b2.purge();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Snapshot of T1 followed by T2, each MRU first.
    pub fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        let mut items = Vec::with_capacity(self.len());
        items.extend(self.t1.items());
        items.extend(self.t2.items());
        items
    }

    pub fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Current target size for T1.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Reports which list holds `key`, without reordering.
    pub fn list_of(&self, key: &Key) -> Option<ArcList> {
        if self.t1.contains(key) {
            Some(ArcList::T1)
        } else if self.t2.contains(key) {
            Some(ArcList::T2)
        } else if self.b1.contains(key) {
            Some(ArcList::B1)
        } else if self.b2.contains(key) {
            Some(ArcList::B2)
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
        self.t1.check_invariants()?;
        self.t2.check_invariants()?;
        self.b1.check_invariants()?;
        self.b2.check_invariants()?;

        ensure_invariant!(
            self.p <= self.size,
            "p ({}) exceeds size ({})",
            self.p,
            self.size
        );
        ensure_invariant!(
            self.len() <= self.size,
            "T1 ({}) + T2 ({}) exceeds size ({})",
            self.t1.len(),
            self.t2.len(),
            self.size
        );
        ensure_invariant!(self.t1.no_ghosts(), "T1 holds a ghost entry");
        ensure_invariant!(self.t2.no_ghosts(), "T2 holds a ghost entry");
        ensure_invariant!(self.b1.all_ghosts(), "B1 holds a value");
        ensure_invariant!(self.b2.all_ghosts(), "B2 holds a value");

        let lists = [&self.t1, &self.t2, &self.b1, &self.b2];
        for (i, list) in lists.iter().enumerate() {
            for key in list.keys() {
                for other in &lists[i + 1..] {
                    ensure_invariant!(!other.contains(&key), "key {} is in two lists", key);
                }
            }
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
impl<V> ArcCache<V> {
    pub fn metrics_snapshot(&self) -> ArcMetricsSnapshot {
        ArcMetricsSnapshot {
            core: self.metrics.core.core_snapshot(),
            t1_to_t2_promotions: self.metrics.t1_to_t2_promotions,
            b1_ghost_hits: self.metrics.b1_ghost_hits,
            b2_ghost_hits: self.metrics.b2_ghost_hits,
            p_increases: self.metrics.p_increases,
            p_decreases: self.metrics.p_decreases,
            t1_evictions: self.metrics.t1_evictions,
            t2_evictions: self.metrics.t2_evictions,
            p: self.p,
            cache_len: self.len(),
            capacity: self.size,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = ArcMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsSnapshotProvider<ArcMetricsSnapshot> for ArcCache<V> {
    fn snapshot(&self) -> ArcMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<V> CoreCache<V> for ArcCache<V> {
    fn get(&mut self, key: &Key) -> Option<&V> {
        ArcCache::get(self, key)
    }

    fn put(&mut self, key: Key, value: V) {
        ArcCache::put(self, key, value)
    }

    fn peek(&self, key: &Key) -> Option<&V> {
        ArcCache::peek(self, key)
    }

    fn remove(&mut self, key: &Key) -> bool {
        ArcCache::remove(self, key)
    }

    fn purge(&mut self) {
        ArcCache::purge(self)
    }

    fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        ArcCache::items(self)
    }

    fn contains(&self, key: &Key) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.size
    }
}

impl<V> fmt::Debug for ArcCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("size", &self.size)
            .field("p", &self.p)
            .field("t1_len", &self.t1.len())
            .field("t2_len", &self.t2.len())
            .field("b1_len", &self.b1.len())
            .field("b2_len", &self.b2.len())
            .finish()
    }
}
