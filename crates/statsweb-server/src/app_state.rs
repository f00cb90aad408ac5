//! Shared application state for the statsweb server.
//!
//! Built once at startup and cloned into every handler through axum's
//! `State` extractor. Holds the hit counter, the metrics backends, and the
//! Lissajous generator wired to them.

use std::sync::Arc;
use std::time::Duration;

use statsweb_core::curve::Lissajous;
use statsweb_core::error::Result;
use statsweb_core::metrics::{FanoutSink, MetricsSink};

use crate::config::{MetricNames, ServerConfig};
use crate::counter::HitCounter;
use crate::obs::metrics::Registry;
use crate::obs::statsd::StatsdClient;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    hits: HitCounter,
    registry: Arc<Registry>,
    statsd: Option<Arc<StatsdClient>>,
    metrics: Arc<dyn MetricsSink>,
    lissajous: Lissajous,
}

impl AppState {
    /// Assemble state from an already validated config.
    ///
    /// Every event goes to the in-process registry, and to `statsd` when given.
    pub fn new(cfg: ServerConfig, statsd: Option<Arc<StatsdClient>>) -> Self {
        let registry = Arc::new(Registry::new());

        let mut fanout = FanoutSink::default();
        fanout.push(registry.clone());
        if let Some(client) = &statsd {
            fanout.push(client.clone());
        }
        let metrics: Arc<dyn MetricsSink> = Arc::new(fanout);

        let lissajous = Lissajous::new(cfg.curve, metrics.clone(), cfg.metric_names.generator());

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                hits: HitCounter::new(),
                registry,
                statsd,
                metrics,
                lissajous,
            }),
        }
    }

    /// Connect the StatsD client (when enabled), start its flusher, and build
    /// the state. Socket errors are returned so startup can fail loudly.
    pub async fn start(cfg: ServerConfig) -> Result<Self> {
        let statsd = if cfg.statsd.enabled {
            let client = Arc::new(StatsdClient::connect(&cfg.statsd).await?);
            client.spawn_flusher(Duration::from_millis(cfg.statsd.flush_interval_ms));
            Some(client)
        } else {
            tracing::info!("statsd disabled; metrics stay in-process");
            None
        };
        Ok(Self::new(cfg, statsd))
    }

    /// Final StatsD flush. Safe to call when StatsD is disabled.
    pub async fn shutdown(&self) {
        if let Some(client) = &self.inner.statsd {
            client.close().await;
        }
    }

    pub fn names(&self) -> &MetricNames {
        &self.inner.cfg.metric_names
    }

    pub fn hits(&self) -> &HitCounter {
        &self.inner.hits
    }

    pub fn metrics(&self) -> &dyn MetricsSink {
        self.inner.metrics.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn lissajous(&self) -> &Lissajous {
        &self.inner.lissajous
    }
}
