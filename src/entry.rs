//! Keys, entries and snapshot items shared by every policy.
//!
//! An [`Entry`] is either a live value or a ghost: a value-less marker kept
//! only to remember that a key was evicted recently. Ghosts live exclusively in
//! the ghost queues of [`TwoQCache`](crate::policy::two_q::TwoQCache) and
//! [`ArcCache`](crate::policy::arc::ArcCache) and are never returned by `get`,
//! `peek` or `items`.

/// Cache key. All policies are keyed by a fixed-width unsigned integer.
pub type Key = u64;

/// Payload slot of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<V> {
    /// A cached value.
    Present(V),
    /// A recently evicted key whose value was dropped.
    Ghost,
}

impl<V> Entry<V> {
    /// Returns `true` for ghost entries.
    #[inline]
    pub fn is_ghost(&self) -> bool {
        matches!(self, Entry::Ghost)
    }

    /// Returns a reference to the value, or `None` for a ghost.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Entry::Present(value) => Some(value),
            Entry::Ghost => None,
        }
    }

    /// Consumes the entry, returning the value if there is one.
    #[inline]
    pub fn into_value(self) -> Option<V> {
        match self {
            Entry::Present(value) => Some(value),
            Entry::Ghost => None,
        }
    }
}

/// One `(key, value)` pair of an `items()` snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<V> {
    pub key: Key,
    pub value: V,
}

impl<V> Item<V> {
    #[inline]
    pub fn new(key: Key, value: V) -> Self {
        Self { key, value }
    }
}
