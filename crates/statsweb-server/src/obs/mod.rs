//! Metrics backends behind `statsweb_core::metrics::MetricsSink`.
//!
//! - `metrics`: in-process registry, rendered at `/metrics`.
//! - `statsd`: buffered StatsD client flushing over UDP.

pub mod metrics;
pub mod statsd;
