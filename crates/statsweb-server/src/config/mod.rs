//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use statsweb_core::error::{Result, StatsWebError};

pub use schema::{MetricNames, ServerConfig, ServerSection, StatsdConfig};

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| StatsWebError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the validated defaults.
pub fn load_or_default(path: &str) -> Result<ServerConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path, "config file not found, using defaults");
            let cfg = ServerConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(StatsWebError::BadConfig(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| StatsWebError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
