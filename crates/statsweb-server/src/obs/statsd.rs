//! Buffered StatsD client.
//!
//! Events are aggregated in memory and flushed over a connected UDP socket on
//! a fixed interval:
//! - counters sum by name between flushes: `<prefix><name>:<n>|c`
//! - timings are sent individually in milliseconds: `<prefix><name>:<ms>|ms`
//!
//! Lines are joined with `\n` into datagrams no larger than
//! `max_packet_bytes` (a single oversized line goes out alone). Send failures
//! are logged and dropped; metrics are best-effort.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::net::UdpSocket;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use statsweb_core::error::{Result, StatsWebError};
use statsweb_core::metrics::MetricsSink;

use crate::config::StatsdConfig;

#[derive(Default)]
struct Buffer {
    counters: DashMap<String, AtomicU64>,
    timings: Mutex<Vec<(String, u64)>>,
}

impl Buffer {
    /// Take everything buffered so far and render it as StatsD lines.
    fn drain_lines(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self.counters.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        let mut lines = Vec::with_capacity(keys.len());
        for k in keys {
            if let Some((name, v)) = self.counters.remove(&k) {
                lines.push(format!("{prefix}{name}:{}|c", v.into_inner()));
            }
        }

        let timings = {
            let mut g = self.timings.lock().unwrap_or_else(|p| p.into_inner());
            std::mem::take(&mut *g)
        };
        for (name, ms) in timings {
            lines.push(format!("{prefix}{name}:{ms}|ms"));
        }
        lines
    }
}

/// Group lines into `\n`-joined payloads of at most `max` bytes.
pub fn pack_lines(lines: &[String], max: usize) -> Vec<String> {
    let mut packets = Vec::new();
    let mut cur = String::new();
    for line in lines {
        if !cur.is_empty() && cur.len() + 1 + line.len() > max {
            packets.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push('\n');
        }
        cur.push_str(line);
    }
    if !cur.is_empty() {
        packets.push(cur);
    }
    packets
}

pub struct StatsdClient {
    prefix: String,
    max_packet_bytes: usize,
    socket: UdpSocket,
    buffer: Buffer,
    shutdown: Notify,
    flusher: Mutex<Option<JoinHandle<()>>>,
}

impl StatsdClient {
    /// Resolve the agent address and connect an ephemeral UDP socket to it.
    pub async fn connect(cfg: &StatsdConfig) -> Result<Self> {
        let target = tokio::net::lookup_host(cfg.addr.as_str())
            .await
            .map_err(|e| StatsWebError::BadConfig(format!("statsd.addr {}: {e}", cfg.addr)))?
            .next()
            .ok_or_else(|| {
                StatsWebError::BadConfig(format!("statsd.addr {} resolved to nothing", cfg.addr))
            })?;

        let bind = if target.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind).await?;
        socket.connect(target).await?;

        tracing::info!(%target, prefix = %cfg.prefix, "statsd client connected");

        Ok(Self {
            prefix: cfg.prefix.clone(),
            max_packet_bytes: cfg.max_packet_bytes,
            socket,
            buffer: Buffer::default(),
            shutdown: Notify::new(),
            flusher: Mutex::new(None),
        })
    }

    /// Send everything buffered. Returns the number of datagrams sent.
    pub async fn flush(&self) -> usize {
        let lines = self.buffer.drain_lines(&self.prefix);
        if lines.is_empty() {
            return 0;
        }

        let mut sent = 0;
        for packet in pack_lines(&lines, self.max_packet_bytes) {
            match self.socket.send(packet.as_bytes()).await {
                Ok(_) => sent += 1,
                Err(e) => {
                    tracing::warn!(error = %e, bytes = packet.len(), "statsd send failed; dropping packet");
                }
            }
        }
        tracing::trace!(lines = lines.len(), packets = sent, "statsd flushed");
        sent
    }

    /// Start the periodic flush task. No-op if one is already running.
    pub fn spawn_flusher(self: &Arc<Self>, every: Duration) {
        let mut slot = self.flusher.lock().unwrap_or_else(|p| p.into_inner());
        if slot.is_some() {
            return;
        }

        let client = Arc::clone(self);
        *slot = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        client.flush().await;
                    }
                    _ = client.shutdown.notified() => break,
                }
            }
        }));
    }

    /// Stop the flush task and send whatever is still buffered.
    pub async fn close(&self) {
        let handle = self
            .flusher
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(h) = handle {
            self.shutdown.notify_one();
            if let Err(e) = h.await {
                tracing::warn!(error = %e, "statsd flusher task failed");
            }
        }
        self.flush().await;
        tracing::info!("statsd client closed");
    }
}

impl MetricsSink for StatsdClient {
    fn increment_counter(&self, name: &str, amount: u64) {
        if let Some(c) = self.buffer.counters.get(name) {
            c.fetch_add(amount, Ordering::Relaxed);
            return;
        }
        self.buffer
            .counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    fn record_timing(&self, name: &str, seconds: f64) {
        let ms = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1000.0).round() as u64
        } else {
            0
        };
        self.buffer
            .timings
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((name.to_string(), ms));
    }
}
