//! Catalog store metrics.
//!
//! Each catalog store owns one `CatalogMetrics` so counts are per translator
//! rather than process-global.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for catalog lookups.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
    /// Lookups answered from the in-memory cache
    cache_hits: AtomicUsize,

    /// Catalogs parsed from the application's locale directory
    disk_loads: AtomicUsize,

    /// Catalogs served from the bundled defaults
    bundled_loads: AtomicUsize,

    /// Catalogs found neither on disk nor bundled
    absent_catalogs: AtomicUsize,

    /// Keys that did not resolve inside an existing catalog
    missing_keys: AtomicUsize,
}

impl CatalogMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disk_load(&self) {
        self.disk_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bundled_load(&self) {
        self.bundled_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_absent_catalog(&self) {
        self.absent_catalogs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn disk_loads(&self) -> usize {
        self.disk_loads.load(Ordering::Relaxed)
    }

    pub fn bundled_loads(&self) -> usize {
        self.bundled_loads.load(Ordering::Relaxed)
    }

    pub fn absent_catalogs(&self) -> usize {
        self.absent_catalogs.load(Ordering::Relaxed)
    }

    pub fn missing_keys(&self) -> usize {
        self.missing_keys.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let disk_loads = self.disk_loads();
        let bundled_loads = self.bundled_loads();
        let absent = self.absent_catalogs();

        // Every lookup is either a cache hit or exactly one of the three load outcomes
        let lookups = hits + disk_loads + bundled_loads + absent;
        let cache_hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            disk_loads,
            bundled_loads,
            absent_catalogs: absent,
            missing_keys: self.missing_keys(),
            cache_hit_rate,
        }
    }
}

/// Snapshot of catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub disk_loads: usize,
    pub bundled_loads: usize,
    pub absent_catalogs: usize,
    pub missing_keys: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,
}
