//! ghostcache: bounded in-memory caches with LRU, 2Q and ARC replacement.
//!
//! Every policy is built from the same primitive, the bounded LRU container
//! in [`policy::lru`]. 2Q and ARC layer ghost tracking (remembering keys
//! after their values are evicted) and their own promotion rules on top.
//!
//! ```text
//!   CacheBuilder ──► Cache<V> ──┬──► LruCore<V>
//!                               ├──► TwoQCache<V>  = recent + frequent + ghost
//!                               └──► ArcCache<V>   = T1 + T2 + B1 + B2 + p
//! ```
//!
//! Keys are `u64`. Values are any `V`; only [`CoreCache::items`] needs
//! `V: Clone`.
//!
//! ## Example
//!
//! ```
//! use ghostcache::prelude::*;
//!
//! let mut cache = TwoQCache::new(4);
//! for key in 1..=5 {
//!     cache.put(key, key * 10);
//! }
//! // key 1 was pushed out of the recent queue but is still remembered
//! assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Ghost));
//! cache.put(1, 10);
//! assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
//! ```
//!
//! No type synchronizes internally; wrap a cache in a mutex to share it.

pub mod builder;
pub mod ds;
pub mod entry;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use traits::CoreCache;
