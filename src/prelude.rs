pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::entry::{Item, Key};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{ArcMetricsSnapshot, LruMetricsSnapshot, TwoQMetricsSnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::MetricsSnapshotProvider;
pub use crate::policy::arc::{ArcCache, ArcList};
pub use crate::policy::lru::LruCore;
pub use crate::policy::two_q::{TwoQCache, TwoQQueue};
pub use crate::traits::CoreCache;
