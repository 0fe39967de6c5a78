use crate::metrics::snapshot::CoreMetricsSnapshot;
use crate::metrics::traits::{ArcMetricsRecorder, CoreMetricsRecorder, TwoQMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct CoreMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
}

impl CoreMetrics {
    pub fn core_snapshot(&self) -> CoreMetricsSnapshot {
        CoreMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
        }
    }
}

impl CoreMetricsRecorder for CoreMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {}
}

/// The bounded LRU records only the shared counters.
pub type LruMetrics = CoreMetrics;

/// Forwards `CoreMetricsRecorder` to the embedded `core` counters.
macro_rules! delegate_core_recorder {
    ($ty:ty) => {
        impl CoreMetricsRecorder for $ty {
            fn record_get_hit(&mut self) {
                self.core.record_get_hit();
            }
            fn record_get_miss(&mut self) {
                self.core.record_get_miss();
            }
            fn record_insert_call(&mut self) {
                self.core.record_insert_call();
            }
            fn record_insert_new(&mut self) {
                self.core.record_insert_new();
            }
            fn record_insert_update(&mut self) {
                self.core.record_insert_update();
            }
            fn record_evict_call(&mut self) {
                self.core.record_evict_call();
            }
            fn record_evicted_entry(&mut self) {
                self.core.record_evicted_entry();
            }
            fn record_clear(&mut self) {
                self.core.record_clear();
            }
        }
    };
}

// ---------------------------------------------------------------------------
// TwoQMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct TwoQMetrics {
    pub core: CoreMetrics,
    pub recent_to_frequent_promotions: u64,
    pub ghost_hits: u64,
    pub recent_evictions: u64,
    pub frequent_evictions: u64,
}

delegate_core_recorder!(TwoQMetrics);

impl TwoQMetricsRecorder for TwoQMetrics {
    fn record_recent_to_frequent_promotion(&mut self) {
        self.recent_to_frequent_promotions += 1;
    }
    fn record_ghost_hit(&mut self) {
        self.ghost_hits += 1;
    }
    fn record_recent_eviction(&mut self) {
        self.recent_evictions += 1;
    }
    fn record_frequent_eviction(&mut self) {
        self.frequent_evictions += 1;
    }
}

// ---------------------------------------------------------------------------
// ArcMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ArcMetrics {
    pub core: CoreMetrics,
    pub t1_to_t2_promotions: u64,
    pub b1_ghost_hits: u64,
    pub b2_ghost_hits: u64,
    pub p_increases: u64,
    pub p_decreases: u64,
    pub t1_evictions: u64,
    pub t2_evictions: u64,
}

delegate_core_recorder!(ArcMetrics);

impl ArcMetricsRecorder for ArcMetrics {
    fn record_t1_to_t2_promotion(&mut self) {
        self.t1_to_t2_promotions += 1;
    }
    fn record_b1_ghost_hit(&mut self) {
        self.b1_ghost_hits += 1;
    }
    fn record_b2_ghost_hit(&mut self) {
        self.b2_ghost_hits += 1;
    }
    fn record_p_increase(&mut self) {
        self.p_increases += 1;
    }
    fn record_p_decrease(&mut self) {
        self.p_decreases += 1;
    }
    fn record_t1_eviction(&mut self) {
        self.t1_evictions += 1;
    }
    fn record_t2_eviction(&mut self) {
        self.t2_evictions += 1;
    }
}
