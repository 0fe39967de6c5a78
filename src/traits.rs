//! # Cache Trait
//!
//! [`CoreCache`] is the uniform surface shared by the three replacement
//! policies, so callers can pick a policy without changing call sites.
//!
//! ```text
//!                  ┌─────────────────────────────────────────┐
//!                  │              CoreCache<V>               │
//!                  │                                         │
//!                  │  get(&mut, &Key)   → Option<&V>         │
//!                  │  put(&mut, Key, V)                      │
//!                  │  peek(&, &Key)     → Option<&V>         │
//!                  │  remove(&mut, &Key) → bool              │
//!                  │  purge(&mut)                            │
//!                  │  items(&)          → Vec<Item<V>>       │
//!                  │  contains / len / is_empty / capacity   │
//!                  └──────────────────┬──────────────────────┘
//!                                     │
//!          ┌──────────────────────────┼──────────────────────────┐
//!          ▼                          ▼                          ▼
//!   ┌──────────────┐          ┌───────────────┐          ┌──────────────┐
//!   │  LruCore<V>  │          │ TwoQCache<V>  │          │ ArcCache<V>  │
//!   └──────────────┘          └───────────────┘          └──────────────┘
//! ```
//!
//! ## Semantics shared by every implementation
//!
//! | Method     | Reorders | Notes                                              |
//! |------------|----------|----------------------------------------------------|
//! | `get`      | yes      | May promote between internal queues                |
//! | `put`      | yes      | May evict; never fails                             |
//! | `peek`     | no       | Never consults ghost entries                       |
//! | `remove`   | -        | `true` if a live or ghost entry was deleted        |
//! | `items`    | no       | Cloned snapshot, MRU first within each sub-queue   |
//! | `len`      | -        | Live entries only; ghosts are metadata             |
//!
//! ## Thread Safety
//!
//! No implementation synchronizes internally. Wrap the cache in a mutex for
//! shared access; every call mutates recency state, so a reader-writer lock
//! gains nothing.

use crate::entry::{Item, Key};

/// Core cache operations that every policy supports.
///
/// # Example
///
/// ```
/// use ghostcache::policy::arc::ArcCache;
/// use ghostcache::policy::lru::LruCore;
/// use ghostcache::traits::CoreCache;
///
/// fn warm<C: CoreCache<String>>(cache: &mut C, data: &[(u64, &str)]) {
///     for (key, value) in data {
///         cache.put(*key, value.to_string());
///     }
/// }
///
/// let mut lru = LruCore::new(8);
/// let mut arc = ArcCache::new(8);
/// warm(&mut lru, &[(1, "one"), (2, "two")]);
/// warm(&mut arc, &[(1, "one"), (2, "two")]);
/// assert_eq!(lru.len(), arc.len());
/// ```
pub trait CoreCache<V> {
    /// Returns the value for `key`, updating recency/promotion state on a hit.
    fn get(&mut self, key: &Key) -> Option<&V>;

    /// Inserts or updates `key`, evicting as the policy dictates.
    fn put(&mut self, key: Key, value: V);

    /// Returns the value for `key` without changing any ordering.
    fn peek(&self, key: &Key) -> Option<&V>;

    /// Deletes `key` from whichever internal queue holds it.
    ///
    /// Returns `true` if anything was removed. Calling it again is a no-op.
    fn remove(&mut self, key: &Key) -> bool;

    /// Discards every entry, ghosts included.
    fn purge(&mut self);

    /// Independent snapshot of the live entries.
    fn items(&self) -> Vec<Item<V>>
    where
        V: Clone;

    /// Returns `true` if `key` holds a live value. Does not reorder.
    fn contains(&self, key: &Key) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if no live entries are cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured maximum number of live entries.
    fn capacity(&self) -> usize;
}
