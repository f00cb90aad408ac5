use std::net::SocketAddr;

use serde::Deserialize;
use statsweb_core::curve::{CurveParams, GeneratorMetricNames};
use statsweb_core::error::{Result, StatsWebError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub statsd: StatsdConfig,

    #[serde(default)]
    pub metric_names: MetricNames,

    #[serde(default)]
    pub curve: CurveParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            statsd: StatsdConfig::default(),
            metric_names: MetricNames::default(),
            curve: CurveParams::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatsWebError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.statsd.validate()?;
        self.metric_names.validate()?;
        self.curve.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            StatsWebError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "127.0.0.1:8000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Agent address (`host:port`); hostnames are resolved at connect time.
    #[serde(default = "default_statsd_addr")]
    pub addr: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    #[serde(default = "default_max_packet_bytes")]
    pub max_packet_bytes: usize,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            addr: default_statsd_addr(),
            prefix: default_prefix(),
            flush_interval_ms: default_flush_interval_ms(),
            max_packet_bytes: default_max_packet_bytes(),
        }
    }
}

impl StatsdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.addr.trim().is_empty() {
            return Err(StatsWebError::BadConfig("statsd.addr must not be empty".into()));
        }
        if !(100..=60000).contains(&self.flush_interval_ms) {
            return Err(StatsWebError::BadConfig(
                "statsd.flush_interval_ms must be between 100 and 60000".into(),
            ));
        }
        if !(512..=65507).contains(&self.max_packet_bytes) {
            return Err(StatsWebError::BadConfig(
                "statsd.max_packet_bytes must be between 512 and 65507".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_statsd_addr() -> String {
    "127.0.0.1:8125".into()
}
fn default_prefix() -> String {
    "test.statsweb.".into()
}
fn default_flush_interval_ms() -> u64 {
    2000
}
fn default_max_packet_bytes() -> usize {
    1432
}

/// Metric names emitted by the hit layer and each handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MetricNames {
    pub total: String,
    pub default_page: String,
    pub debug_page: String,
    pub counter_page: String,
    pub help_page: String,
    pub lissajous_page: String,
    pub lissajous_time: String,
    /// Per-method counter is `<method>.<method_suffix>`.
    pub method_suffix: String,
}

impl Default for MetricNames {
    fn default() -> Self {
        Self {
            total: "total.pageview.count".into(),
            default_page: "default.pageview.count".into(),
            debug_page: "debug.pageview.count".into(),
            counter_page: "counter.pageview.count".into(),
            help_page: "help.pageview.count".into(),
            lissajous_page: "lissajous.pageview.count".into(),
            lissajous_time: "lissajous.load.time".into(),
            method_suffix: "requests.counter".into(),
        }
    }
}

impl MetricNames {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("total", &self.total),
            ("default_page", &self.default_page),
            ("debug_page", &self.debug_page),
            ("counter_page", &self.counter_page),
            ("help_page", &self.help_page),
            ("lissajous_page", &self.lissajous_page),
            ("lissajous_time", &self.lissajous_time),
            ("method_suffix", &self.method_suffix),
        ];
        for (key, v) in fields {
            if v.trim().is_empty() {
                return Err(StatsWebError::BadConfig(format!(
                    "metric_names.{key} must not be empty"
                )));
            }
            // StatsD line separators
            if v.contains(&[':', '|', '\n'][..]) {
                return Err(StatsWebError::BadConfig(format!(
                    "metric_names.{key} must not contain ':', '|' or newlines"
                )));
            }
        }
        Ok(())
    }

    pub fn generator(&self) -> GeneratorMetricNames {
        GeneratorMetricNames {
            duration: self.lissajous_time.clone(),
            count: self.lissajous_page.clone(),
        }
    }

    /// Standard methods get their own series; anything else lands in
    /// `other.<method_suffix>` so clients cannot mint new names.
    pub fn method_counter(&self, method: &str) -> String {
        let m = match method {
            "GET" => "get",
            "HEAD" => "head",
            "POST" => "post",
            "PUT" => "put",
            "DELETE" => "delete",
            "PATCH" => "patch",
            "OPTIONS" => "options",
            "CONNECT" => "connect",
            "TRACE" => "trace",
            _ => "other",
        };
        format!("{m}.{}", self.method_suffix)
    }
}
