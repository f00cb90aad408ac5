//! In-process metrics registry.
//!
//! Counters and timing histograms keyed by metric name, backed by `DashMap`
//! and atomics. Histogram buckets are fixed in microseconds to avoid floating
//! point accumulation.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use statsweb_core::metrics::MetricsSink;

const NAMESPACE: &str = "statsweb";

// 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, 10s
const BUCKETS_MICROS: [u64; 9] = [
    1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

/// Prometheus-safe metric name: `statsweb_` + name with every char outside
/// `[A-Za-z0-9_]` replaced by `_`.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(NAMESPACE.len() + 1 + name.len());
    out.push_str(NAMESPACE);
    out.push('_');
    out.extend(name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }));
    out
}

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    max: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl AtomicHistogram {
    fn observe(&self, micros: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
        self.max.fetch_max(micros, Ordering::Relaxed);

        // Cumulative: every bucket at or above the value.
        for (bucket, &le) in self.buckets.iter().zip(BUCKETS_MICROS.iter()) {
            if micros <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Snapshot of one timing series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSummary {
    pub count: u64,
    pub sum_micros: u64,
    pub max_micros: u64,
}

#[derive(Default)]
pub struct Registry {
    counters: DashMap<String, AtomicU64>,
    timings: DashMap<String, AtomicHistogram>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.counters.get(name).map(|c| c.load(Ordering::Relaxed))
    }

    pub fn timing(&self, name: &str) -> Option<TimingSummary> {
        self.timings.get(name).map(|h| TimingSummary {
            count: h.count.load(Ordering::Relaxed),
            sum_micros: h.sum.load(Ordering::Relaxed),
            max_micros: h.max.load(Ordering::Relaxed),
        })
    }

    /// Render in Prometheus text exposition format, sorted by name.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let mut counters: Vec<(String, u64)> = self
            .counters
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        counters.sort();
        for (name, val) in counters {
            let n = sanitize(&name);
            let _ = writeln!(out, "# TYPE {n} counter");
            let _ = writeln!(out, "{n} {val}");
        }

        let mut names: Vec<String> = self.timings.iter().map(|r| r.key().clone()).collect();
        names.sort();
        for name in names {
            let Some(hist) = self.timings.get(&name) else {
                continue;
            };
            let n = format!("{}_micros", sanitize(&name));
            let _ = writeln!(out, "# TYPE {n} histogram");
            for (bucket, le) in hist.buckets.iter().zip(BUCKETS_MICROS.iter()) {
                let _ = writeln!(out, "{n}_bucket{{le=\"{le}\"}} {}", bucket.load(Ordering::Relaxed));
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{n}_bucket{{le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{n}_sum {}", hist.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{n}_count {count}");
        }

        out
    }
}

impl MetricsSink for Registry {
    fn increment_counter(&self, name: &str, amount: u64) {
        // Skip the String allocation on the hot path once the series exists.
        if let Some(c) = self.counters.get(name) {
            c.fetch_add(amount, Ordering::Relaxed);
            return;
        }
        self.counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    fn record_timing(&self, name: &str, seconds: f64) {
        let micros = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1_000_000.0).round() as u64
        } else {
            0
        };
        if let Some(h) = self.timings.get(name) {
            h.observe(micros);
            return;
        }
        self.timings
            .entry(name.to_string())
            .or_insert_with(AtomicHistogram::default)
            .observe(micros);
    }
}
