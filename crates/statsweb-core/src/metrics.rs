//! Metrics capability used by the generator and the HTTP layer.
//!
//! Callers only see two operations: bump a counter, record a timing sample.
//! The transport behind them (StatsD over UDP, an in-process registry, or both)
//! is chosen by the server at startup.

use std::sync::Arc;

/// Narrow metrics interface. Implementations must be cheap and non-blocking;
/// they are called from request tasks and from blocking worker threads.
pub trait MetricsSink: Send + Sync {
    /// Add `amount` to the counter `name`.
    fn increment_counter(&self, name: &str, amount: u64);

    /// Record one duration sample for `name`, in seconds.
    fn record_timing(&self, name: &str, seconds: f64);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn increment_counter(&self, _name: &str, _amount: u64) {}
    fn record_timing(&self, _name: &str, _seconds: f64) {}
}

/// Forwards every event to each inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn MetricsSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn MetricsSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn MetricsSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl MetricsSink for FanoutSink {
    fn increment_counter(&self, name: &str, amount: u64) {
        for s in &self.sinks {
            s.increment_counter(name, amount);
        }
    }

    fn record_timing(&self, name: &str, seconds: f64) {
        for s in &self.sinks {
            s.record_timing(name, seconds);
        }
    }
}
