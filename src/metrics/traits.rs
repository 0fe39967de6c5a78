//! # Metrics Trait Hierarchy
//!
//! ```text
//!                     ┌─────────────────────────────┐
//!                     │     CoreMetricsRecorder     │
//!                     │  get_hit/get_miss/insert    │
//!                     │  evict/clear                │
//!                     └──────────────┬──────────────┘
//!                                    │
//!                 ┌──────────────────┴──────────────────┐
//!                 ▼                                     ▼
//!        ┌─────────────────┐                  ┌─────────────────┐
//!        │ TwoQ Recorder   │                  │  Arc Recorder   │
//!        │ promotion/ghost │                  │ ghost hits / p  │
//!        └─────────────────┘                  └─────────────────┘
//!
//!   Consumption:  MetricsSnapshotProvider<S>  ──►  MetricsExporter<S>
//! ```
//!
//! Recorders only write counters; providers only read; exporters only
//! publish.

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Metrics for Two-Queue behavior (recent/frequent/ghost queues).
pub trait TwoQMetricsRecorder: CoreMetricsRecorder {
    fn record_recent_to_frequent_promotion(&mut self);
    fn record_ghost_hit(&mut self);
    fn record_recent_eviction(&mut self);
    fn record_frequent_eviction(&mut self);
}

/// Metrics for ARC behavior (adaptive replacement with ghost lists).
pub trait ArcMetricsRecorder: CoreMetricsRecorder {
    fn record_t1_to_t2_promotion(&mut self);
    fn record_b1_ghost_hit(&mut self);
    fn record_b2_ghost_hit(&mut self);
    fn record_p_increase(&mut self);
    fn record_p_decrease(&mut self);
    fn record_t1_eviction(&mut self);
    fn record_t2_eviction(&mut self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
