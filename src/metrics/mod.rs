//! Optional hit/miss/eviction counters (feature `metrics`).
//!
//! Recording, snapshotting and export are split the same way as the cache
//! surface: policies own a recorder, callers read `Copy` snapshots, and
//! exporters publish snapshots to monitoring backends.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
