/// Shared counters for any policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
}

impl CoreMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub core: CoreMetricsSnapshot,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TwoQMetricsSnapshot {
    pub core: CoreMetricsSnapshot,

    pub recent_to_frequent_promotions: u64,
    pub ghost_hits: u64,
    pub recent_evictions: u64,
    pub frequent_evictions: u64,

    pub cache_len: usize,
    pub ghost_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArcMetricsSnapshot {
    pub core: CoreMetricsSnapshot,

    pub t1_to_t2_promotions: u64,
    pub b1_ghost_hits: u64,
    pub b2_ghost_hits: u64,
    pub p_increases: u64,
    pub p_decreases: u64,
    pub t1_evictions: u64,
    pub t2_evictions: u64,

    pub p: usize,
    pub cache_len: usize,
    pub capacity: usize,
}
