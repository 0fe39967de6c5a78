//! Unified cache builder for all replacement policies.
//!
//! Lets the policy be chosen at runtime while callers keep a single
//! concrete type, [`Cache<V>`].
//!
//! ## Example
//!
//! ```rust
//! use ghostcache::builder::{CacheBuilder, CachePolicy};
//! use ghostcache::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<String>(CachePolicy::Arc);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use crate::entry::{Item, Key};
use crate::error::{ConfigError, InvariantError};
use crate::policy::arc::ArcCache;
use crate::policy::lru::LruCore;
use crate::policy::two_q::{DEFAULT_GHOST_RATIO, DEFAULT_RECENT_RATIO, TwoQCache};
use crate::traits::CoreCache;

/// Available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachePolicy {
    /// Plain least recently used eviction.
    Lru,
    /// Two-Queue with configurable queue ratios.
    TwoQ { recent_ratio: f64, ghost_ratio: f64 },
    /// Adaptive Replacement Cache.
    Arc,
}

impl CachePolicy {
    /// 2Q with the default 0.25 / 0.50 ratios.
    pub fn two_q() -> Self {
        CachePolicy::TwoQ {
            recent_ratio: DEFAULT_RECENT_RATIO,
            ghost_ratio: DEFAULT_GHOST_RATIO,
        }
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
pub struct Cache<V> {
    inner: CacheInner<V>,
    policy: CachePolicy,
}

enum CacheInner<V> {
    Lru(LruCore<V>),
    TwoQ(TwoQCache<V>),
    Arc(ArcCache<V>),
}

macro_rules! dispatch {
    ($inner:expr, $cache:ident => $body:expr) => {
        match $inner {
            CacheInner::Lru($cache) => $body,
            CacheInner::TwoQ($cache) => $body,
            CacheInner::Arc($cache) => $body,
        }
    };
}

impl<V> Cache<V> {
    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Checks the internal invariants of the wrapped policy.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        dispatch!(&self.inner, cache => cache.check_invariants())
    }
}

impl<V> CoreCache<V> for Cache<V> {
    fn get(&mut self, key: &Key) -> Option<&V> {
        dispatch!(&mut self.inner, cache => cache.get(key))
    }

    fn put(&mut self, key: Key, value: V) {
        dispatch!(&mut self.inner, cache => cache.put(key, value))
    }

    fn peek(&self, key: &Key) -> Option<&V> {
        dispatch!(&self.inner, cache => cache.peek(key))
    }

    fn remove(&mut self, key: &Key) -> bool {
        dispatch!(&mut self.inner, cache => cache.remove(key))
    }

    fn purge(&mut self) {
        dispatch!(&mut self.inner, cache => cache.purge())
    }

    fn items(&self) -> Vec<Item<V>>
    where
        V: Clone,
    {
        dispatch!(&self.inner, cache => cache.items())
    }

    fn contains(&self, key: &Key) -> bool {
        dispatch!(&self.inner, cache => CoreCache::contains(cache, key))
    }

    fn len(&self) -> usize {
        dispatch!(&self.inner, cache => cache.len())
    }

    fn capacity(&self) -> usize {
        dispatch!(&self.inner, cache => cache.capacity())
    }
}

impl<V> std::fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(&self.inner, cache => std::fmt::Debug::fmt(cache, f))
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero or a 2Q ratio is out
    /// of range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ghostcache::builder::{CacheBuilder, CachePolicy};
    /// use ghostcache::error::ConfigError;
    ///
    /// let cache = CacheBuilder::new(100).try_build::<String>(CachePolicy::two_q());
    /// assert!(cache.is_ok());
    ///
    /// let err = CacheBuilder::new(0).try_build::<String>(CachePolicy::Lru);
    /// assert_eq!(err.unwrap_err(), ConfigError::ZeroCapacity);
    /// ```
    pub fn try_build<V>(self, policy: CachePolicy) -> Result<Cache<V>, ConfigError> {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCore::try_new(self.capacity)?),
            CachePolicy::TwoQ {
                recent_ratio,
                ghost_ratio,
            } => CacheInner::TwoQ(TwoQCache::try_with_ratios(
                self.capacity,
                recent_ratio,
                ghost_ratio,
            )?),
            CachePolicy::Arc => CacheInner::Arc(ArcCache::try_new(self.capacity)?),
        };

        Ok(Cache { inner, policy })
    }

    /// Build a cache with the specified policy.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters. See [`try_build`](Self::try_build).
    pub fn build<V>(self, policy: CachePolicy) -> Cache<V> {
        match self.try_build(policy) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }
}
