use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use crate::metrics::snapshot::{
    ArcMetricsSnapshot, CoreMetricsSnapshot, LruMetricsSnapshot, TwoQMetricsSnapshot,
};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// or forwarded to an OpenTelemetry collector. Write errors are dropped;
/// metrics are best-effort.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.lock();
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.lock();
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }

    fn write_core(&self, core: &CoreMetricsSnapshot) {
        self.write_counter("get_calls_total", core.get_calls);
        self.write_counter("get_hits_total", core.get_hits);
        self.write_counter("get_misses_total", core.get_misses);
        self.write_counter("insert_calls_total", core.insert_calls);
        self.write_counter("insert_updates_total", core.insert_updates);
        self.write_counter("insert_new_total", core.insert_new);
        self.write_counter("evict_calls_total", core.evict_calls);
        self.write_counter("evicted_entries_total", core.evicted_entries);
    }
}

impl<W: Write + Send> MetricsExporter<LruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LruMetricsSnapshot) {
        self.write_core(&snapshot.core);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}

impl<W: Write + Send> MetricsExporter<TwoQMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TwoQMetricsSnapshot) {
        self.write_core(&snapshot.core);
        self.write_counter(
            "recent_to_frequent_promotions_total",
            snapshot.recent_to_frequent_promotions,
        );
        self.write_counter("ghost_hits_total", snapshot.ghost_hits);
        self.write_counter("recent_evictions_total", snapshot.recent_evictions);
        self.write_counter("frequent_evictions_total", snapshot.frequent_evictions);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("ghost_len", snapshot.ghost_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}

impl<W: Write + Send> MetricsExporter<ArcMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &ArcMetricsSnapshot) {
        self.write_core(&snapshot.core);
        self.write_counter("t1_to_t2_promotions_total", snapshot.t1_to_t2_promotions);
        self.write_counter("b1_ghost_hits_total", snapshot.b1_ghost_hits);
        self.write_counter("b2_ghost_hits_total", snapshot.b2_ghost_hits);
        self.write_counter("p_increases_total", snapshot.p_increases);
        self.write_counter("p_decreases_total", snapshot.p_decreases);
        self.write_counter("t1_evictions_total", snapshot.t1_evictions);
        self.write_counter("t2_evictions_total", snapshot.t2_evictions);
        self.write_gauge("p", snapshot.p as u64);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("ghostcache", Vec::new());
        let snapshot = LruMetricsSnapshot {
            core: CoreMetricsSnapshot {
                get_calls: 3,
                get_hits: 2,
                ..Default::default()
            },
            cache_len: 5,
            capacity: 8,
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE ghostcache_get_calls_total counter"));
        assert!(text.contains("ghostcache_get_hits_total 2"));
        assert!(text.contains("# TYPE ghostcache_capacity gauge"));
        assert!(text.contains("ghostcache_cache_len 5"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&ArcMetricsSnapshot {
            p: 3,
            ..Default::default()
        });
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\np 3\n"));
        assert!(text.starts_with("# TYPE get_calls_total counter"));
    }
}
